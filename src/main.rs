//! Command line entry point for the league ranker
//!
//! Loads the configuration, reads the league's competitions from cached
//! JSON files, runs the league and prints the standings.

use anyhow::{Context, Result};
use clap::Parser;
use league_ranker::config::{validate_config, AppConfig};
use league_ranker::{InMemoryRatingStore, JsonDirectoryProvider, LeagueReport, LeagueRunner};
use league_ranker::PlayerId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// League Ranker - seasonal disc-golf league standings and round ratings
#[derive(Parser)]
#[command(
    name = "league-ranker",
    version,
    about = "Compute disc-golf league standings and round ratings from per-hole results"
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// League to run
    #[arg(long, value_name = "NAME", help = "Name of the league in the configuration")]
    league: String,

    /// Directory of cached competition files
    #[arg(
        long,
        value_name = "DIR",
        help = "Directory holding <competition id>.json files"
    )]
    data: PathBuf,

    /// Trusted ratings file
    #[arg(
        long,
        value_name = "FILE",
        help = "JSON object mapping player ids to trusted ratings"
    )]
    ratings: Option<PathBuf>,

    /// Report output file
    #[arg(short, long, value_name = "FILE", help = "Write the full report as JSON")]
    output: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without running the league")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file, environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(config_path) => AppConfig::from_file(config_path)?,
        None => AppConfig::from_env()?,
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    validate_config(&config)?;
    Ok(config)
}

fn load_ratings(path: &Path) -> Result<InMemoryRatingStore> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read ratings file {}", path.display()))?;
    let ratings: BTreeMap<PlayerId, i32> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse ratings file {}", path.display()))?;
    Ok(InMemoryRatingStore::with_trusted(ratings))
}

fn print_report(report: &LeagueReport) {
    println!("{}", report.title);
    println!("{}", "=".repeat(report.title.len()));

    for category in &report.standings.categories {
        println!();
        println!("{} ({} players)", category.name, category.entries.len());
        for entry in &category.entries {
            println!(
                "{:>4}. {:<32} {:>5}  ({} played)",
                entry.place,
                entry.player.name,
                entry.total,
                entry.competitions_played()
            );
        }
    }

    let top = report.top_rounds(10);
    if top.iter().any(|(_, result)| result.effective_rating().is_some()) {
        println!();
        println!("Best rounds");
        for (round, result) in top.iter().filter(|(_, r)| r.effective_rating().is_some()) {
            println!(
                "  {:>5}  {:<32} {} ({})",
                result.effective_rating().unwrap_or_default(),
                result.player.name,
                round.name,
                round.date
            );
        }
    }

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings");
        for message in report.warning_messages() {
            println!("  {}", message);
        }
    }
}

fn run(args: &Args, config: &AppConfig) -> Result<()> {
    let ratings = match &args.ratings {
        Some(path) => load_ratings(path)?,
        None => InMemoryRatingStore::new(),
    };
    info!("Loaded {} trusted ratings", ratings.trusted_count());

    let provider = Arc::new(JsonDirectoryProvider::new(&args.data));
    let mut runner = LeagueRunner::from_config(config, &args.league, provider, ratings)?;
    let report = runner.run()?;

    print_report(&report);

    if let Some(output) = &args.output {
        let file = std::fs::File::create(output)
            .with_context(|| format!("Failed to create {}", output.display()))?;
        serde_json::to_writer_pretty(file, &report)?;
        info!("Report written to {}", output.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        let league = config.league(&args.league)?;
        info!("Configuration validation successful");
        info!(
            "League '{}': {} competitions, best {} results count",
            league.title,
            league.competition_ids.len(),
            league.best_n
        );
        return Ok(());
    }

    if let Err(e) = run(&args, &config) {
        error!("League run failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}
