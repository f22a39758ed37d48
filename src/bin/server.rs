//! Document Q&A API server binary
//!
//! Run with: cargo run --bin docqa-server [config.toml]

use std::path::PathBuf;

use docqa::config::AppConfig;
use docqa::server::ApiServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docqa=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load_or_default(config_path.as_deref())?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Generation model: {}", config.llm.generate_model);
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Collection: {}", config.index.collection);
    tracing::info!("  - Chunk size: {} (overlap {})", config.chunking.chunk_size, config.chunking.chunk_overlap);

    let server = match ApiServer::connect(config.clone()).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Is Ollama running at {}?", config.llm.base_url);
            tracing::warn!("  1. Start it: ollama serve");
            tracing::warn!(
                "  2. Pull models: ollama pull {} && ollama pull {}",
                config.llm.embed_model,
                config.llm.generate_model
            );
            anyhow::bail!(e);
        }
    };

    println!("Document Q&A server");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!();
    println!("Endpoints:");
    println!("  POST   /upload - Upload documents");
    println!("  POST   /query  - Ask questions");
    println!("  GET    /stats  - Index statistics");
    println!("  DELETE /clear  - Delete all documents");
    println!();
    println!("Press Ctrl+C to stop");

    server.start().await?;

    Ok(())
}
