//! Funnel Report CLI
//!
//! # Usage
//!
//! ```bash
//! # Run every report against a SQLite snapshot
//! cargo run --bin funnel-report --release -- run --db rides.sqlite --output target/funnel
//!
//! # Selected reports with a YAML config
//! cargo run --bin funnel-report -- run --db rides.sqlite --config funnel.yaml \
//!     --report general_funnel --report platform_distribution
//!
//! # Print the effective configuration
//! cargo run --bin funnel-report -- config --config funnel.yaml
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use funnel_engine::{FunnelConfig, FunnelPipeline, JsonReporter, ReportKind, ValidatedConfig};
use funnel_storage::SqliteEntitySource;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "funnel-report")]
#[command(about = "Ride funnel analytics - conversion tables from a ride snapshot", long_about = None)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute reports and write one JSON file per table
    Run {
        /// SQLite database holding the five collections
        #[arg(long)]
        db: PathBuf,

        /// YAML configuration (schema v1)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Report to compute (repeatable; overrides the configured list)
        #[arg(short, long = "report")]
        reports: Vec<String>,

        /// Output directory
        #[arg(short, long, default_value = "target/funnel_reports")]
        output: PathBuf,
    },

    /// Print the effective configuration as YAML
    Config {
        /// YAML configuration (schema v1)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            db,
            config,
            reports,
            output,
        } => {
            let config = load_config(config.as_deref(), &reports)?;
            run_reports(&db, config, &output)?;
        }
        Commands::Config { config } => {
            let config = load_config(config.as_deref(), &[])?;
            print!("{}", config.as_inner().to_yaml()?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let ansi = std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    tracing_subscriber::fmt()
        .with_ansi(ansi)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .init();
}

fn load_config(path: Option<&Path>, reports: &[String]) -> anyhow::Result<ValidatedConfig> {
    let config = match path {
        Some(path) => {
            let path_str = path.to_str().context("config path is not valid UTF-8")?;
            FunnelConfig::from_yaml(path_str)
                .with_context(|| format!("loading config {}", path.display()))?
                .into_inner()
        }
        None => FunnelConfig::default(),
    };

    let config = if reports.is_empty() {
        config
    } else {
        let kinds = reports
            .iter()
            .map(|name| ReportKind::from_str(name))
            .collect::<Result<Vec<_>, _>>()?;
        config.reports(kinds)
    };

    Ok(config.build()?)
}

fn run_reports(db: &Path, config: ValidatedConfig, output: &Path) -> anyhow::Result<()> {
    let source = SqliteEntitySource::open(db)
        .with_context(|| format!("opening {}", db.display()))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    let pipeline = FunnelPipeline::new(config);
    let reports = runtime.block_on(pipeline.run(&source))?;

    let paths = JsonReporter::save(&reports, output)?;
    for path in &paths {
        println!("{}", path.display());
    }

    if let Some(stats) = reports.join_stats {
        if stats.orphans() > 0 {
            eprintln!(
                "note: {} orphan signups, {} orphan transactions, {} orphan reviews were not joined",
                stats.orphan_signups, stats.orphan_transactions, stats.orphan_reviews
            );
        }
    }

    Ok(())
}
