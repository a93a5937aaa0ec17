//! Command-line interface components.

use crate::config::ReportConfig;
use crate::metrics::MetricsEngine;
use crate::render;
use crate::report::parse_report;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "unit-economics")]
#[command(about = "Analyse an Ozon unit-economics CSV export: costs, tax, profit and margin per SKU")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Path to the unit-economics CSV report
    #[arg(value_name = "REPORT")]
    pub report_path: PathBuf,

    /// TOML configuration file (defaults to the user config directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Spread total ad spend across products by revenue share
    #[arg(long)]
    pub distribute_ads_evenly: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Show only the N products with the highest sales revenue
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl Args {
    /// Log level implied by the verbosity flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }

    /// Resolve the configuration: file first, then command-line overrides
    pub fn load_config(&self) -> Result<ReportConfig> {
        let config = match &self.config {
            Some(path) => ReportConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ReportConfig::load_default().context("Failed to load default config")?,
        };

        Ok(if self.distribute_ads_evenly {
            config.with_distribute_ads_evenly(true)
        } else {
            config
        })
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("unit_economics={}", args.log_level())));

    // A subscriber may already be installed
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}

/// Main command runner
pub async fn run(args: Args) -> Result<()> {
    setup_logging(&args);
    debug!("Command line arguments: {:?}", args);

    let config = args.load_config()?;
    debug!("Loaded configuration: {:?}", config);

    let result = parse_report(&args.report_path, &config)
        .await
        .with_context(|| format!("Failed to analyse {}", args.report_path.display()))?;
    info!(
        "Analysed {} rows across {} products",
        result.row_count(),
        result.products.len()
    );

    let engine = MetricsEngine::new(config.rules, config.distribute_ads_evenly);
    let report = render::Report::build(&result, &engine, args.top);

    match args.format {
        OutputFormat::Table => render::print_table(&report),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize report as JSON")?;
            println!("{}", json);
        }
    }

    Ok(())
}
