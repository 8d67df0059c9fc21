//! Solar command-line client
//!
//! Loads `.env`, then configuration from `SOLAR_CONFIG` (a TOML file) or from
//! the environment alone, and runs a single command:
//!
//! ```text
//! solar models
//! solar check
//! solar embed <text>...
//! solar chat <prompt>
//! ```
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use anyhow::{bail, Context};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use upstage_solar::{
    catalog::ModelCatalog,
    chat::{ChatClient, ChatModel},
    config::Config,
    embedding::{EmbeddingClient, EmbeddingProvider},
    provider::ProviderClient,
    telemetry::{init_from_config, MetricsCollector, TelemetrySink, TracedEmbeddings},
};

const USAGE: &str = "usage: solar <models|check|embed <text>...|chat <prompt>>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = match std::env::var("SOLAR_CONFIG") {
        Ok(path) => Config::from_file_with_env(&path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        Err(_) => Config::from_env().context("failed to load configuration from environment")?,
    };

    init_from_config(&config.logging);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };

    let metrics = Arc::new(MetricsCollector::new());

    let output = match command.as_str() {
        "models" => {
            let provider = ProviderClient::new(config.provider.clone())?;
            let options = ModelCatalog::new(provider).options().await;
            serde_json::to_value(options)?
        }
        "check" => {
            let provider = ProviderClient::new(config.provider.clone())?;
            serde_json::to_value(provider.test_credential().await)?
        }
        "embed" => {
            if rest.is_empty() {
                bail!("embed needs at least one text\n{}", USAGE);
            }
            let client = EmbeddingClient::from_config(&config)?;
            let sink: Arc<dyn TelemetrySink> = metrics.clone();
            let embeddings = TracedEmbeddings::new(client, Some(sink));

            let vectors = embeddings.embed_many(rest).await?;
            serde_json::json!({
                "model": embeddings.model(),
                "count": vectors.len(),
                "embeddings": vectors,
            })
        }
        "chat" => {
            if rest.is_empty() {
                bail!("chat needs a prompt\n{}", USAGE);
            }
            let client = ChatClient::from_config(&config).await?;
            let started = Instant::now();
            let completion = client.prompt(&rest.join(" ")).await?;
            metrics.record_chat(&completion.usage, started.elapsed());

            serde_json::json!({
                "model": completion.model.clone().unwrap_or_else(|| client.model().to_string()),
                "content": completion.content,
                "usage": completion.usage,
            })
        }
        other => bail!("unknown command `{}`\n{}", other, USAGE),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    let snapshot = metrics.get_metrics();
    info!(
        "Done: documents={} chat_tokens={}",
        snapshot.documents_embedded, snapshot.chat_tokens
    );

    Ok(())
}
