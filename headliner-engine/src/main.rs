//! headliner - ranking and similarity report for the concert lineup
//!
//! Loads the artist score and audio feature tables once, runs the engine and
//! prints the report to stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use headliner_common::config::{ConfigResolver, LoggingConfig};
use headliner_common::logging::init_tracing;
use headliner_common::TomlConfig;
use headliner_engine::{DashboardReport, Dataset};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Command-line arguments for headliner
#[derive(Parser, Debug)]
#[command(name = "headliner")]
#[command(about = "Artist ranking, clustering and similarity report")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Artist score CSV (overrides config)
    #[arg(long)]
    artists: Option<PathBuf>,

    /// Audio feature CSV (overrides config)
    #[arg(long)]
    features: Option<PathBuf>,

    /// Reference artist for the similarity lookup (overrides config)
    #[arg(long)]
    reference: Option<String>,

    /// Number of similar artists (overrides config)
    #[arg(short)]
    k: Option<usize>,

    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

impl Args {
    fn apply(&self, config: &mut TomlConfig) {
        if let Some(path) = &self.artists {
            config.data.artist_scores = Some(path.clone());
        }
        if let Some(path) = &self.features {
            config.data.features = Some(path.clone());
        }
        if let Some(reference) = &self.reference {
            config.similarity.reference = reference.clone();
        }
        if let Some(k) = self.k {
            config.similarity.k = k;
        }
    }
}

fn main() -> Result<()> {
    // Default level until the config is loaded
    let log_handle = init_tracing(&LoggingConfig::default())?;

    let args = Args::parse();
    info!("Starting headliner v{}", env!("CARGO_PKG_VERSION"));

    let resolver = ConfigResolver::new(args.config.clone());
    let mut config =
        TomlConfig::resolve_and_load(&resolver).context("Failed to load configuration")?;
    args.apply(&mut config);
    config.validate().context("Invalid command-line override")?;
    log_handle.apply(&config.logging)?;

    let dataset = Dataset::load(&config.data).context("Failed to load source tables")?;
    info!(
        "Loaded {} ranked artists and {} feature rows",
        dataset.artists.len(),
        dataset.features.len()
    );

    let report = DashboardReport::build(&dataset, &config).context("Failed to build report")?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", report.to_text()),
    }
    Ok(())
}
