//! # Grounded CLI
//!
//! Commands for ingesting documents and asking grounded questions.
//!
//! ## Usage
//!
//! ```bash
//! grounded --config ./config/grounded.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `grounded add <paths...>` | Add files or directories to the store |
//! | `grounded ask "<question>"` | Answer one question and exit |
//! | `grounded chat` | Interactive question-answering session |
//! | `grounded get <uri>` | Print a resource's raw content |

mod answer;
mod config;
mod context;
mod gate;
mod get;
mod ingest;
mod models;
mod retrieve;
mod session;
mod store;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Grounded — retrieval-augmented question answering over a semantic
/// document store.
#[derive(Parser)]
#[command(
    name = "grounded",
    about = "Grounded — retrieval-augmented question answering over a semantic document store",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/grounded.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Add files or directories to the document store.
    ///
    /// Directories are walked recursively; each file is ingested
    /// independently and a failure on one never aborts the batch. After
    /// the batch, waits for the store's background processing.
    Add {
        /// File or directory paths to ingest.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Target namespace URI; defaults to `retrieval.ingest_target`
        /// from the config.
        #[arg(long)]
        target: Option<String>,
    },

    /// Answer a single question and exit.
    ///
    /// Prints the ranked hits with scores, then the generated answer.
    Ask {
        /// The question to answer.
        question: String,

        /// Scope retrieval to a namespace subtree.
        #[arg(long)]
        target: Option<String>,

        /// Override the configured result limit.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Start an interactive question-answering session.
    ///
    /// One question per line; `quit`, `exit`, `q`, or end-of-input ends
    /// the session. A failed question is reported and the loop continues.
    Chat {
        /// Scope retrieval to a namespace subtree.
        #[arg(long)]
        target: Option<String>,
    },

    /// Print a resource's raw content by URI.
    Get {
        /// Resource URI, e.g. `viking://resources/contract/fund-a`.
        uri: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        // Setup failures are the only fatal ones; log the full chain.
        error!("fatal: {:#}", e);
        eprintln!("fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Add { paths, target } => {
            ingest::run_add(&cfg, &paths, target).await?;
        }
        Commands::Ask {
            question,
            target,
            limit,
        } => {
            session::run_ask(&cfg, &question, target, limit).await?;
        }
        Commands::Chat { target } => {
            session::run_chat(&cfg, target).await?;
        }
        Commands::Get { uri } => {
            get::run_get(&cfg, &uri).await?;
        }
    }

    Ok(())
}
