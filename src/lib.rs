pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::CompletionClient;

pub use connector::{OpenAiClient, OpenAiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

pub use domain::{DomainError, FunctionCall, FunctionDefinition, Message, Role, Schema};
