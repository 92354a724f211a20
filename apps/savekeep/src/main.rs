//! savekeep entry point.

mod stages;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use savekeep_resolve::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "savekeep", version)]
#[command(about = "Locate and back up Steam save games", long_about = None)]
struct Cli {
    /// Load configuration from this file instead of `.env`.
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Scan Steam libraries and resolve candidate save paths
    Discover,
    /// Check candidate paths on disk for every identity
    Verify,
    /// Copy verified save directories into the backup directory
    Backup,
    /// Write the store names of verified titles
    Names,
    /// Run all stages in order
    Run,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Variables already set in the environment take precedence.
    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path).with_context(|| format!("failed to load {}", path.display()))?;
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting savekeep");

    let config = Config::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        match cli.command {
            Command::Discover => stages::discover(&config).await.map(|_| ()),
            Command::Verify => stages::verify(&config).map(|_| ()),
            Command::Backup => stages::backup(&config).map(|_| ()),
            Command::Names => stages::names(&config).await.map(|_| ()),
            Command::Run => stages::run_all(&config).await,
        }
    })
}
