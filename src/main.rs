use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use healthsnap::{report, App, RunOptions, Settings};
use healthsnap_sdk::MemoryStore;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "healthsnap")]
#[command(about = "Collect, normalize and upload a health-metric snapshot")]
struct Args {
    /// JSON fixture describing the health store
    #[arg(short, long)]
    fixture: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Export the snapshot and normalized record to a JSON file
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Upload the normalized record
    #[arg(short, long)]
    upload: bool,

    /// Document to upload (may be repeated)
    #[arg(short, long = "document")]
    documents: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let settings = Settings::load(args.config.as_deref()).context("failed to load configuration")?;

    let fixture = tokio::fs::read_to_string(&args.fixture)
        .await
        .with_context(|| format!("failed to read {}", args.fixture.display()))?;
    let store = MemoryStore::from_json(&fixture)
        .with_context(|| format!("invalid store fixture {}", args.fixture.display()))?;

    let options = RunOptions {
        export: args.export,
        upload: args.upload,
        documents: args.documents,
    };
    let app = App::new(settings, store, options);

    let published = app.collect().await?;
    print!("{}", report::render(&published.snapshot, app.catalog()));
    app.deliver(&published).await
}
