use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use tracing::instrument::WithSubscriber;
use tracing::{debug, error, info_span, Dispatch, Instrument};
use uuid::Uuid;

use super::openai_config::OpenAiConfig;
use super::openai_wire::{ChatRequest, ChatResponse, Choice};
use crate::application::CompletionClient;
use crate::domain::{DomainError, FunctionDefinition, Message};

/// HTTP client for the OpenAI chat completion API and compatible servers
/// (LocalAI, vLLM, Ollama's OpenAI endpoint, ...).
///
/// Implements [`CompletionClient`]: one `POST /v1/chat/completions` per call,
/// no retries, no state kept between calls. The client is `Send + Sync` and
/// can be shared across tasks.
///
/// Logging goes to the dispatcher given to [`OpenAiClient::with_logger`].
/// Without one, the client is silent and never writes to the global
/// subscriber.
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: Url,
    api_key: Option<String>,
    model: String,
    logger: Dispatch,
}

impl OpenAiClient {
    /// Build a client, applying defaults and validating `config`.
    ///
    /// Fails with a config error when the base URL is the hosted OpenAI
    /// service and no key was supplied, and with an invalid-URL error when
    /// the base URL cannot be used.
    pub fn new(config: OpenAiConfig) -> Result<Self, DomainError> {
        let resolved = config.resolve()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = resolved.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DomainError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: resolved.endpoint,
            api_key: resolved.api_key,
            model: resolved.model,
            logger: Dispatch::none(),
        })
    }

    /// Construct from `OPENAI_API_BASE`, `OPENAI_API_KEY` and `OPENAI_API_MODEL`.
    pub fn from_env() -> Result<Self, DomainError> {
        Self::new(OpenAiConfig::from_env())
    }

    /// Route this client's diagnostics to `logger`.
    pub fn with_logger(mut self, logger: impl Into<Dispatch>) -> Self {
        self.logger = logger.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full URL requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send(
        &self,
        system: &str,
        user: &str,
        history: &[Message],
        functions: &[FunctionDefinition],
    ) -> Result<Message, DomainError> {
        debug!(content = user, "called completion");

        let request = ChatRequest::new(&self.model, system, user, history, functions);
        let body = serde_json::to_vec(&request).map_err(|e| {
            error!(error = %e, "failed to marshal request");
            DomainError::serialization(e.to_string())
        })?;
        debug!(request = %String::from_utf8_lossy(&body), "request data");

        let mut http_request = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request.send().await.map_err(|e| {
            error!(error = %e, endpoint = %self.endpoint, "failed to call completion service");
            DomainError::transport(e.to_string())
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            error!(error = %e, "failed to read response body");
            DomainError::response_read(e.to_string())
        })?;
        debug!(
            status = status.as_u16(),
            content = %String::from_utf8_lossy(&bytes),
            "completion response"
        );

        let parsed: ChatResponse = serde_json::from_slice(&bytes).map_err(|e| {
            error!(error = %e, status = status.as_u16(), "failed to unmarshal completion response");
            DomainError::deserialization(format!("HTTP {status}: {e}"))
        })?;

        if status != StatusCode::OK {
            let message = parsed.error_message().unwrap_or_default();
            error!(status = status.as_u16(), error = message, "response status is not success");
            return Err(DomainError::remote(status.as_u16(), message));
        }

        if let Some(message) = parsed.error_message().filter(|m| !m.is_empty()) {
            error!(error = message, "response carries an error despite success status");
            return Err(DomainError::remote(status.as_u16(), message));
        }

        let [choice] = <[Choice; 1]>::try_from(parsed.choices).map_err(|choices| {
            error!(count = choices.len(), "unexpected number of choices in response");
            DomainError::ChoiceCount(choices.len())
        })?;

        debug!(result = ?choice.message, "request completed successfully");
        Ok(choice.message)
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("authenticated", &self.api_key.is_some())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        history: &[Message],
        functions: &[FunctionDefinition],
    ) -> Result<Message, DomainError> {
        // Local correlation id only; never sent to the service.
        let request_id = Uuid::new_v4();

        async move {
            let span = info_span!("openai", request_id = %request_id, model = %self.model);
            self.send(system, user, history, functions)
                .instrument(span)
                .await
        }
        .with_subscriber(self.logger.clone())
        .await
    }
}
