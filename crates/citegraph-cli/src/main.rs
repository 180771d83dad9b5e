//! citegraph — batch link-discovery pipeline over a directory of PDFs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use citegraph_core::PipelineConfig;
use citegraph_runtime::Pipeline;
use citegraph_store::{GraphStore, SqliteGraphStore};

/// Discover hyperlinks in PDFs, track their reachability, and fetch the
/// publicly accessible ones into a citation graph.
#[derive(Parser, Debug)]
#[command(name = "citegraph", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one batch: ingest, probe, fetch, normalize.
    Run {
        /// Directory of input PDFs (overrides CITEGRAPH_DOCS_DIR).
        #[arg(long)]
        docs_dir: Option<PathBuf>,

        /// Directory for raw downloads (overrides CITEGRAPH_RAW_DIR).
        #[arg(long)]
        raw_dir: Option<PathBuf>,

        /// Directory for normalized text (overrides CITEGRAPH_CLEAN_DIR).
        #[arg(long)]
        clean_dir: Option<PathBuf>,

        /// Print the run report as JSON on stdout.
        #[arg(long)]
        json: bool,
    },
    /// Print graph node and edge counts.
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            docs_dir,
            raw_dir,
            clean_dir,
            json,
        } => {
            let mut config = PipelineConfig::from_env()?;
            if let Some(dir) = docs_dir {
                config.docs_dir = dir;
            }
            if let Some(dir) = raw_dir {
                config.raw_dir = dir;
            }
            if let Some(dir) = clean_dir {
                config.clean_dir = dir;
            }
            config.ensure_dirs()?;

            let store = SqliteGraphStore::open(&config.graph.uri)?;
            let pipeline = Pipeline::new(&store, &config);
            let report = pipeline.run().await?;

            let stats = store.stats()?;
            info!(
                "Batch complete: {} documents, {} resources, {} citations in graph",
                stats.source_documents, stats.linked_resources, stats.citations
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Command::Stats => {
            let config = PipelineConfig::from_env()?;
            let store = SqliteGraphStore::open(&config.graph.uri)?;
            let stats = store.stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
