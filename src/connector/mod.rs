//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Chat completion over HTTP (OpenAI and compatible servers)

pub mod adapter;

pub use adapter::*;
