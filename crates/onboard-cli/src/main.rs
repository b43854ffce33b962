//! # onboard-cli
//!
//! Command-line front end for transporter onboarding validation.
//!
//! Exit codes: `0` every transporter accepted, `1` at least one transporter
//! rejected or an orphaned row found, `2` the batch could not be validated.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use onboard_lookup::{
    CachedLookup, ExistingRecords, GeoDirectory, InMemoryLookup, LookupProvider, StoreConfig,
    StoreLookup,
};
use onboard_model::{ParsedDataset, ValidationResult};
use onboard_pipeline::{TextReport, ValidationConfig, Validator};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "onboard")]
#[command(about = "Transporter bulk onboarding validation")]
#[command(version)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a parsed onboarding workbook
    Validate {
        /// Parsed workbook (JSON)
        input: PathBuf,

        /// Geographic directory (YAML, or JSON by extension)
        #[arg(short, long)]
        geo: PathBuf,

        /// Snapshot of already-persisted business names and emails (YAML)
        #[arg(short, long, conflicts_with = "db")]
        existing: Option<PathBuf>,

        /// Persisted transporter store (libsql database file)
        #[arg(long)]
        db: Option<String>,

        /// Validation settings (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Validate {
            input,
            geo,
            existing,
            db,
            config,
            format,
        } => {
            tracing::info!("Validating {}", input.display());
            let dataset = load_dataset(&input)?;
            let config = match config {
                Some(path) => ValidationConfig::from_path(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => ValidationConfig::default(),
            };
            let lookup = build_lookup(&geo, existing.as_deref(), db).await?;

            let result = Validator::with_config(lookup, config)?
                .validate(&dataset)
                .await
                .context("Batch validation failed")?;

            print_result(&result, format)?;
            Ok(if result.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
    }
}

fn load_dataset(path: &Path) -> anyhow::Result<ParsedDataset> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open dataset {}", path.display()))?;
    let dataset = ParsedDataset::from_json_reader(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to parse dataset {}", path.display()))?;
    tracing::debug!(
        transporters = dataset.transporter_count(),
        rows = dataset.row_count(),
        "dataset loaded"
    );
    Ok(dataset)
}

async fn build_lookup(
    geo: &Path,
    existing: Option<&Path>,
    db: Option<String>,
) -> anyhow::Result<Arc<dyn LookupProvider>> {
    let geo = GeoDirectory::from_path(geo)
        .with_context(|| format!("Failed to load geographic directory {}", geo.display()))?;
    tracing::info!(countries = geo.len(), "geographic directory loaded");

    if let Some(url) = db {
        let store = StoreLookup::connect(StoreConfig::local(url.clone()), geo)
            .await
            .with_context(|| format!("Failed to open store {url}"))?;
        return Ok(Arc::new(CachedLookup::new(store)));
    }

    let mut lookup = InMemoryLookup::new(geo);
    if let Some(path) = existing {
        let records = ExistingRecords::from_path(path)
            .with_context(|| format!("Failed to load existing records {}", path.display()))?;
        lookup = lookup.with_existing(records);
    }
    Ok(Arc::new(CachedLookup::new(lookup)))
}

fn print_result(result: &ValidationResult, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", TextReport::new(result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
    }
    Ok(())
}
