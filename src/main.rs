//! # FAQ Harness CLI (`faq`)
//!
//! ## Usage
//!
//! ```bash
//! faq --config ./config/faq.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `faq serve` | Build the FAQ index and start the HTTP server |
//! | `faq ask "<question>"` | Answer one question and print the reply as JSON |
//! | `faq detect "<text>"` | Print the detected language code |
//! | `faq check` | Validate config and corpus, print entries per language |

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use faq_harness::config;
use faq_harness::corpus;
use faq_harness::engine::FaqEngine;
use faq_harness::language::LanguageIdentifier;
use faq_harness::models::LanguageCode;
use faq_harness::server;

/// FAQ Harness: multilingual FAQ matching with exact and semantic lookup.
#[derive(Parser)]
#[command(name = "faq", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/faq.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the FAQ index and start the HTTP server.
    Serve,

    /// Answer a single question and print the reply as JSON.
    ///
    /// The question is recorded in the conversation log like any HTTP request.
    Ask {
        /// The question text.
        question: String,
    },

    /// Print the language code detected for a text.
    ///
    /// Does not need a config file or an embedding model.
    Detect {
        /// The text to classify.
        text: String,
    },

    /// Validate the config and corpus without loading a model.
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Detect { text } = &cli.command {
        println!("{}", LanguageIdentifier::default().identify(text.trim()));
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            let engine = FaqEngine::bootstrap(&cfg).await?;
            server::run_server(&cfg, Arc::new(engine)).await?;
        }
        Commands::Ask { question } => {
            let engine = FaqEngine::bootstrap(&cfg).await?;
            let reply = engine.ask(&question).await?;
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        Commands::Check => {
            let entries = corpus::load_corpus(&cfg.corpus.path)?;
            let mut counts: BTreeMap<&str, usize> =
                LanguageCode::ALL.iter().map(|l| (l.as_str(), 0)).collect();
            for entry in &entries {
                *counts.entry(entry.lang.as_str()).or_default() += 1;
            }

            println!("Corpus:    {}", cfg.corpus.path.display());
            println!("Entries:   {}", entries.len());
            for (lang, count) in counts {
                println!("  {:<4} {}", lang, count);
            }
            println!("Provider:  {}", cfg.embedding.provider);
            println!("Threshold: {}", cfg.matching.threshold);
            println!("Log dir:   {}", cfg.logging.dir.display());
        }
        Commands::Detect { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
