//! Interactive document Q&A chat binary
//!
//! Run with: cargo run --bin docqa-chat [config.toml]

use std::io::Write;
use std::path::PathBuf;

use docqa::chat::{citation_preview, ChatSession};
use docqa::config::AppConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
Commands:
  /upload <paths...>  Upload and index documents (pdf, txt, docx, md)
  /stats              Show how many chunks are indexed
  /clear              Delete all indexed documents and reset the chat
  /help               Show this help
  /quit               Exit
Anything else is asked as a question.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docqa=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load_or_default(config_path.as_deref())?;

    println!("Document Q&A chat");
    println!("  Model: {}", config.llm.generate_model);
    println!("  Embeddings: {}", config.llm.embed_model);
    println!("  Top-K: {}", config.retrieval.top_k);
    println!();

    let mut session = match ChatSession::connect(config.clone()).await {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Is Ollama running at {}? Start it with: ollama serve", config.llm.base_url);
            anyhow::bail!(e);
        }
    };

    if session.documents_loaded() {
        println!("Loaded existing index with {} chunks.", session.stats());
    } else {
        println!("No documents indexed yet. Use /upload to get started.");
    }
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.split_whitespace().next() {
            Some("/quit") | Some("/exit") => break,
            Some("/help") => println!("{}", HELP),
            Some("/stats") => println!("{} chunks indexed.", session.stats()),
            Some("/clear") => {
                if session.clear() {
                    println!("Database cleared.");
                } else {
                    println!("Failed to clear the database.");
                }
            }
            Some("/upload") => {
                let paths: Vec<PathBuf> = input
                    .split_whitespace()
                    .skip(1)
                    .map(PathBuf::from)
                    .collect();

                print!("Processing documents... ");
                std::io::stdout().flush()?;
                match session.upload(&paths).await {
                    Ok(count) => println!("done, {} chunks indexed.", count),
                    Err(e) => println!("failed: {}", e),
                }
            }
            Some(cmd) if cmd.starts_with('/') => {
                println!("Unknown command {}. Try /help.", cmd);
            }
            _ => {
                let outcome = session.ask(input).await;
                println!("{}", outcome.answer);

                if !outcome.sources.is_empty() {
                    println!();
                    println!("Sources:");
                    for (i, source) in outcome.sources.iter().enumerate() {
                        let mut origin = source.metadata.filename.clone();
                        if let Some(page) = source.metadata.page {
                            origin.push_str(&format!(", page {}", page));
                        }
                        println!("  [{}] {}", i + 1, origin);
                        println!("      {}", citation_preview(&source.content, 200));
                    }
                }
                println!();
            }
        }
    }

    println!("Bye.");
    Ok(())
}
