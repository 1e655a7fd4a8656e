use std::fmt;
use std::time::Duration;

use reqwest::header::HeaderValue;
use reqwest::Url;

use crate::domain::DomainError;

/// Hosted OpenAI service. Talking to it requires an API key.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-0613";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";

pub const BASE_URL_ENV: &str = "OPENAI_API_BASE";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "OPENAI_API_MODEL";

/// Settings for [`super::OpenAiClient`].
///
/// Every field is optional; defaults are applied by the client constructor:
///
/// | Field      | Env var            | Default                  |
/// |------------|--------------------|--------------------------|
/// | `base_url` | `OPENAI_API_BASE`  | `https://api.openai.com` |
/// | `api_key`  | `OPENAI_API_KEY`   | none                     |
/// | `model`    | `OPENAI_API_MODEL` | `gpt-3.5-turbo-0613`     |
/// | `timeout`  |                    | none (wait indefinitely) |
///
/// A key is mandatory only when the base URL is the hosted default; other
/// OpenAI-compatible servers may run without authentication.
#[derive(Clone, Default)]
pub struct OpenAiConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub timeout: Option<Duration>,
}

/// Validated settings with defaults applied.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedConfig {
    pub endpoint: Url,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Option<Duration>,
}

impl OpenAiConfig {
    /// Read `OPENAI_API_BASE`, `OPENAI_API_KEY` and `OPENAI_API_MODEL`.
    /// Variables that are unset or empty are left as `None`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] but reads through `lookup`, so callers can
    /// supply variables without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.is_empty());
        Self {
            base_url: read(BASE_URL_ENV),
            api_key: read(API_KEY_ENV),
            model: read(MODEL_ENV),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub(crate) fn resolve(&self) -> Result<ResolvedConfig, DomainError> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string);

        if let Some(key) = &api_key {
            HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| {
                DomainError::config(format!(
                    "{API_KEY_ENV} contains characters that are not allowed in an HTTP header"
                ))
            })?;
        }

        let base = non_blank(self.base_url.as_deref()).unwrap_or(DEFAULT_BASE_URL);
        let base = parse_base_url(base)?;

        if is_default_base(&base) && api_key.is_none() {
            return Err(DomainError::config(format!(
                "{API_KEY_ENV} must be supplied if using openai service"
            )));
        }

        let model = non_blank(self.model.as_deref())
            .unwrap_or(DEFAULT_MODEL)
            .to_string();

        Ok(ResolvedConfig {
            endpoint: completions_endpoint(&base)?,
            api_key,
            model,
            timeout: self.timeout,
        })
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_base_url(base: &str) -> Result<Url, DomainError> {
    let url = Url::parse(base)
        .map_err(|e| DomainError::invalid_url(format!("'{base}' is not a valid base URL: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(DomainError::invalid_url(format!(
            "'{base}' must use http or https"
        )));
    }
    if !url.has_host() {
        return Err(DomainError::invalid_url(format!("'{base}' has no host")));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(DomainError::invalid_url(format!(
            "'{base}' must not contain a query or fragment"
        )));
    }

    Ok(url)
}

fn is_default_base(base: &Url) -> bool {
    base.as_str().trim_end_matches('/') == DEFAULT_BASE_URL
}

/// Append the completions path to the base, keeping any path prefix the base
/// already has (e.g. a reverse proxy mounted under `/openai`).
fn completions_endpoint(base: &Url) -> Result<Url, DomainError> {
    let joined = format!("{}{COMPLETIONS_PATH}", base.as_str().trim_end_matches('/'));
    Url::parse(&joined).map_err(|e| {
        DomainError::invalid_url(format!(
            "failed to create url for chat completion from '{base}': {e}"
        ))
    })
}
