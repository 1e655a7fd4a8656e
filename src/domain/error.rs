use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Response read error: {0}")]
    ResponseRead(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Non-success response. Displays exactly the message the service sent.
    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("unexpected number of choices in response: {0}")]
    ChoiceCount(usize),
}

impl DomainError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_url(msg: impl Into<String>) -> Self {
        Self::InvalidUrl(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn response_read(msg: impl Into<String>) -> Self {
        Self::ResponseRead(msg.into())
    }

    pub fn deserialization(msg: impl Into<String>) -> Self {
        Self::Deserialization(msg.into())
    }

    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_invalid_url(&self) -> bool {
        matches!(self, Self::InvalidUrl(_))
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::ResponseRead(_))
    }

    pub fn is_remote_error(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// HTTP status of a remote error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_displays_only_the_service_message() {
        let err = DomainError::remote(500, "rate limited");
        assert_eq!(err.to_string(), "rate limited");
        assert_eq!(err.status(), Some(500));
        assert!(err.is_remote_error());
    }

    #[test]
    fn remote_error_with_missing_message_is_empty() {
        assert_eq!(DomainError::remote(502, "").to_string(), "");
    }

    #[test]
    fn choice_count_mentions_the_count() {
        let err = DomainError::ChoiceCount(2);
        assert!(err.to_string().contains('2'));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn transport_predicate_covers_read_failures() {
        assert!(DomainError::transport("refused").is_transport_error());
        assert!(DomainError::response_read("eof").is_transport_error());
        assert!(!DomainError::config("x").is_transport_error());
    }
}
