//! # Application Layer
//!
//! Interfaces the connector layer implements and callers depend on.

pub mod interfaces;

pub use interfaces::*;
