use anyhow::Result;
use clap::Parser;
use tracing::{debug, Dispatch};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use chatcomplete::cli::{load_functions, load_messages, Cli};
use chatcomplete::{CompletionClient, OpenAiClient, OpenAiConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_directive()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    tracing::dispatcher::set_global_default(dispatch.clone())?;

    let history = match &cli.history {
        Some(path) => load_messages(path)?,
        None => Vec::new(),
    };
    let functions = match &cli.functions {
        Some(path) => load_functions(path)?,
        None => Vec::new(),
    };

    let config = cli.apply_overrides(OpenAiConfig::from_env());
    debug!(?config, "Resolved configuration");

    let client = OpenAiClient::new(config)?.with_logger(dispatch);
    let message = client
        .complete(&cli.system, &cli.user, &history, &functions)
        .await?;

    println!("{}", serde_json::to_string_pretty(&message)?);
    Ok(())
}
