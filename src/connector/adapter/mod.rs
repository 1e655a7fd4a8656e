mod openai_client;
mod openai_config;
mod openai_wire;

pub use openai_client::*;
pub use openai_config::*;
