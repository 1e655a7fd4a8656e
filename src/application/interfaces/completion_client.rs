use async_trait::async_trait;

use crate::domain::{DomainError, FunctionDefinition, Message};

/// Sends one chat-completion request and returns the assistant's reply.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details. Each call is independent: nothing is remembered between calls, so
/// callers carry the conversation forward by passing it back as `history`.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Complete the conversation `[system] + history + [user]`.
    ///
    /// `functions` are advertised to the model; when empty, no function
    /// definitions are sent at all. Exactly one message is returned, or an
    /// error with no partial result.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        history: &[Message],
        functions: &[FunctionDefinition],
    ) -> Result<Message, DomainError>;
}
