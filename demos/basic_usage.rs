//! Basic usage example for the Solar client
//!
//! Run with `UPSTAGE_API_KEY` set:
//! `cargo run --example basic_usage`

use std::sync::Arc;
use upstage_solar::prelude::*;
use upstage_solar::telemetry::init_observability;

#[tokio::main]
async fn main() -> Result<()> {
    init_observability("info", "pretty");

    println!("=== Upstage Solar Basic Usage Example ===\n");

    let config = Config::from_env()?;

    println!("1. Listing models...");
    let provider = ProviderClient::new(config.provider.clone()).map_err(SolarError::Models)?;
    let catalog = ModelCatalog::new(provider);
    for option in catalog.options().await {
        println!("   - {}", option.value);
    }

    println!("\n2. Embedding documents...");
    let metrics = Arc::new(MetricsCollector::new());
    let sink: Arc<dyn TelemetrySink> = metrics.clone();
    let embeddings = TracedEmbeddings::new(EmbeddingClient::from_config(&config)?, Some(sink));

    let documents = vec![
        "Solar is a family of large language models.".to_string(),
        "Embeddings map text to vectors.".to_string(),
    ];
    let vectors = embeddings.embed_many(&documents).await?;
    for (text, vector) in documents.iter().zip(&vectors) {
        println!("   {} dims <- {}", vector.len(), text);
    }

    let query = embeddings.embed_one("What is Solar?").await?;
    println!("   query vector has {} dims", query.len());

    println!("\n3. Chatting...");
    let chat = ChatClient::from_config(&config).await?;
    let reply = chat
        .complete(
            &[
                ChatMessage::system("Answer in one sentence."),
                ChatMessage::user("What are text embeddings used for?"),
            ],
            &chat.default_options(),
        )
        .await?;
    println!("   [{}] {}", chat.model(), reply.content);
    println!("   tokens used: {}", reply.usage.total_tokens);

    println!("\n4. Metrics\n{}", metrics.export_prometheus());

    Ok(())
}
