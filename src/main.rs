use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use aq_scraper::config::Config;
use aq_scraper::constants;
use aq_scraper::logging;
use aq_scraper::types::SourceDescriptor;
use aq_scraper::Pipeline;

#[derive(Parser)]
#[command(name = "aq_scraper")]
#[command(about = "Chinese air-quality portal adapters")]
#[command(version = "0.1.0")]
struct Cli {
    /// Configuration file (defaults to $AQ_SCRAPER_CONFIG, then config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write JSON logs to this directory, rotated daily
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and normalize the configured sources
    Run {
        /// Specific sources to run (comma-separated names). Defaults to all.
        #[arg(long)]
        sources: Option<String>,
        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },
    /// List registered adapters and configured sources
    List,
    /// Normalize a saved document without touching the network
    Parse {
        /// Adapter (profile) name, e.g. pm25in
        #[arg(long)]
        adapter: String,
        /// HTML or JSON document on disk
        #[arg(long)]
        file: PathBuf,
        /// Configured source to take name, city and attribution from
        #[arg(long)]
        source_name: Option<String>,
        #[arg(long)]
        pretty: bool,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// `list` and `parse` work without a configuration file.
fn load_config_or_default(path: Option<&Path>) -> anyhow::Result<Config> {
    match load_config(path) {
        Ok(config) => Ok(config),
        Err(e) if path.is_none() => {
            warn!("No usable configuration ({}), using built-in defaults", e);
            Ok(Config::from_toml("")?)
        }
        Err(e) => Err(e),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

#[derive(Serialize)]
struct Listing<'a> {
    adapters: Vec<&'a str>,
    sources: Vec<SourceSummary<'a>>,
}

#[derive(Serialize)]
struct SourceSummary<'a> {
    name: &'a str,
    adapter: &'a str,
    active: bool,
    registered: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let _guard = logging::init_logging(cli.log_dir.as_deref());

    match cli.command {
        Commands::Run { sources, pretty } => {
            let config = load_config(cli.config.as_deref())?;
            let selected = match sources {
                Some(list) => {
                    let names: Vec<String> = list
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                    config.select_sources(&names)?
                }
                None => config.sources.clone(),
            };
            if selected.is_empty() {
                bail!("no sources configured");
            }

            let pipeline = Pipeline::from_config(&config)?;
            info!(sources = selected.len(), "Starting run");
            let result = pipeline.run(&selected).await;
            print_json(&result, pretty)?;
        }
        Commands::List => {
            let config = load_config_or_default(cli.config.as_deref())?;
            let registry = config.registry();
            let listing = Listing {
                adapters: registry.list_adapters(),
                sources: config
                    .sources
                    .iter()
                    .map(|s| SourceSummary {
                        name: &s.name,
                        adapter: &s.adapter,
                        active: s.active,
                        registered: registry.get(&s.adapter).is_some(),
                    })
                    .collect(),
            };
            print_json(&listing, true)?;
        }
        Commands::Parse {
            adapter,
            file,
            source_name,
            pretty,
        } => {
            let config = load_config_or_default(cli.config.as_deref())?;
            let body = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;

            let descriptor = match source_name {
                Some(name) => {
                    let mut found = config
                        .select_sources(&[name])?
                        .remove(0);
                    found.adapter = adapter.clone();
                    found
                }
                None => SourceDescriptor {
                    name: adapter.clone(),
                    adapter: adapter.clone(),
                    url: file.display().to_string(),
                    source_url: file.display().to_string(),
                    country: "CN".to_string(),
                    city: None,
                    active: true,
                    attribution: vec![],
                },
            };

            let pipeline = Pipeline::from_config(&config)?;
            let Some(source_adapter) = pipeline.adapter_for(&descriptor) else {
                bail!(
                    "unknown adapter '{}' (built-in: {})",
                    adapter,
                    constants::get_supported_adapters().join(", ")
                );
            };
            let measurements = source_adapter.normalize_document(&body, &descriptor)?;
            info!(measurements = measurements.len(), "Parsed document");
            print_json(&measurements, pretty)?;
        }
    }

    Ok(())
}
