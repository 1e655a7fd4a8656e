//! # Domain Layer
//!
//! Conversation data model and the crate error type.
//! This layer is independent of the HTTP transport and performs no I/O.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
