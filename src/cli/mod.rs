use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;

use crate::connector::OpenAiConfig;
use crate::domain::{FunctionDefinition, Message};

/// Send one prompt to an OpenAI-compatible chat completion endpoint.
///
/// Connection settings come from OPENAI_API_BASE, OPENAI_API_KEY and
/// OPENAI_API_MODEL; the flags below override them.
#[derive(Parser, Debug)]
#[command(name = "chatcomplete")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// User prompt
    pub user: String,

    /// System prompt sent as the first message
    #[arg(short, long, default_value = "")]
    pub system: String,

    /// JSON file with an array of prior messages
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// JSON file with an array of function definitions
    #[arg(short, long)]
    pub functions: Option<PathBuf>,

    /// Overrides OPENAI_API_BASE
    #[arg(long)]
    pub base_url: Option<String>,

    /// Overrides OPENAI_API_MODEL
    #[arg(short, long)]
    pub model: Option<String>,

    /// Give up on the request after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_directive(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Layer the command-line overrides on top of `base`.
    pub fn apply_overrides(&self, mut base: OpenAiConfig) -> OpenAiConfig {
        if let Some(url) = &self.base_url {
            base.base_url = Some(url.clone());
        }
        if let Some(model) = &self.model {
            base.model = Some(model.clone());
        }
        if let Some(secs) = self.timeout_secs {
            base.timeout = Some(Duration::from_secs(secs));
        }
        base
    }
}

pub fn load_messages(path: &Path) -> Result<Vec<Message>> {
    load_json_array(path, "history")
}

pub fn load_functions(path: &Path) -> Result<Vec<FunctionDefinition>> {
    load_json_array(path, "function definitions")
}

fn load_json_array<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {what} in {}", path.display()))
}
