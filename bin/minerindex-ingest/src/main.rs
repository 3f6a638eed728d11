//! Miner Index Ingest
//!
//! Loads miner index snapshots (JSON) and saves them into the on-disk
//! miner index store.

mod commands;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use minerindex_store::{Key, MetadataStore, RedbDatastore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "minerindex-ingest")]
#[command(about = "Miner index snapshot loader")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "/etc/minerindex/ingest.toml")]
    config: PathBuf,

    /// Directory holding the index database
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (overrides the config file)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save a metadata index snapshot
    Meta {
        /// JSON file holding a metadata index
        snapshot: PathBuf,
    },
    /// Save an on-chain index snapshot and its height marker
    Chain {
        /// JSON file holding an on-chain index
        snapshot: PathBuf,
    },
    /// List stored keys
    Dump {
        /// Only list keys below this prefix
        #[arg(long, default_value = "/")]
        prefix: String,
    },
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    // Merge CLI args with config file (CLI takes precedence)
    let mut store_config = config.store;
    if let Some(data_dir) = args.data_dir {
        store_config.data_dir = data_dir;
    }
    let log_level = args.log_level.unwrap_or(config.logging.level);

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_path = store_config.db_path();
    info!("Opening index database at {}", db_path.display());
    let ds = Arc::new(
        RedbDatastore::open(&db_path)
            .with_context(|| format!("opening datastore {}", db_path.display()))?,
    );
    let store = MetadataStore::new(Arc::clone(&ds), &store_config.keyspace)?;

    match args.command {
        Command::Meta { snapshot } => {
            let n = commands::ingest_meta(&store, &snapshot)?;
            info!("Metadata saved for {} miners", n);
        }
        Command::Chain { snapshot } => {
            let n = commands::ingest_chain(&store, &snapshot)?;
            info!("On-chain data saved for {} miners", n);
        }
        Command::Dump { prefix } => {
            let mut stdout = std::io::stdout().lock();
            let n = commands::dump(&ds, store.keyspace(), &Key::new(prefix), &mut stdout)?;
            info!("{} entries", n);
        }
    }

    Ok(())
}
