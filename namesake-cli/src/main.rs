//! namesake CLI - interactive name matching over a Pinecone index
//!
//! # Commands
//!
//! ```bash
//! # Interactive matching (default)
//! namesake
//!
//! # Embed and upsert the built-in names, or a file with one name per line
//! namesake index
//! namesake index --names staff.txt
//! ```
//!
//! Configuration comes from the environment (or `.env`): at least
//! `PINECONE_API_KEY` and `PINECONE_INDEX_NAME`.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use namesake_lib::{
    config::Config,
    embed::{Embedder, MiniLmEmbedder},
    names,
    search::NameMatcher,
    shell::Shell,
    store::PineconeStore,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "namesake")]
#[command(about = "Find the closest stored names by embedding similarity")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read names from stdin and show the closest matches (default)
    Shell,

    /// Embed a list of names and upsert them into the index
    Index {
        /// File with one name per line; the built-in list is used if omitted
        #[arg(short, long)]
        names: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // A missing .env is fine; the variables may already be exported
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    let embedder = MiniLmEmbedder::new(config.model_cache_dir.clone())
        .context("failed to load embedding model")?;
    info!(model = embedder.model_name(), dimension = embedder.dimension(), "model loaded");

    let store = PineconeStore::new(&config.pinecone).context("failed to build Pinecone client")?;
    let mut matcher = NameMatcher::connect(embedder, store, config.index_spec())
        .with_context(|| format!("failed to open index {}", config.pinecone.index_name))?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            Shell::new(stdin.lock(), stdout.lock(), config.top_k).run(&mut matcher)?;
        }

        Commands::Index { names: file } => {
            let names = match file {
                Some(path) => names::load_names(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => names::default_names(),
            };

            let stored = matcher.index(&names).context("indexing failed")?;
            println!("Successfully stored {stored} names in Pinecone");

            // Serverless counts lag behind upserts, so this is informational
            let index = matcher.spec();
            match matcher.len() {
                Ok(total) => info!(index = %index.name, total, "index record count"),
                Err(e) => warn!(index = %index.name, error = %e, "could not read index stats"),
            }
        }
    }

    Ok(())
}
