//! Page-Harvest main entry point
//!
//! This is the command-line interface for the Page-Harvest listing harvester.

use anyhow::Context;
use clap::Parser;
use page_harvest::config::{load_config, Config};
use page_harvest::crawler::{harvest, resolve_list_url};
use page_harvest::output::{load_statistics, print_statistics, print_summary};
use page_harvest::storage::SqliteStore;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Page-Harvest: a bounded-concurrency listing harvester
///
/// Page-Harvest fetches a range of paginated listing pages in parallel,
/// extracts article links with their titles and publish times, and stores
/// each distinct URL once in a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "page-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A bounded-concurrency listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML or YAML configuration file
    #[arg(value_name = "CONFIG", default_value = "./config.yaml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show which pages would be fetched
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

/// Number of newest rows shown by --stats
const RECENT_LIMIT: usize = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_harvest(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_harvest=info,warn"),
            1 => EnvFilter::new("page_harvest=debug,info"),
            2 => EnvFilter::new("page_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: prints the page plan without fetching
fn handle_dry_run(config: &Config) {
    println!("=== Page-Harvest Dry Run ===\n");

    println!("Harvest Configuration:");
    println!("  Database: {}", config.db_path);
    println!("  Listing template: {}", config.base_url);
    if let Some(first) = config.first_page_override() {
        println!("  First page override: {}", first);
    }
    println!(
        "  Pages: {} to {} ({} pages)",
        config.start_page,
        config.end_page,
        config.page_count()
    );
    println!("  Workers: {}", config.max_workers);
    println!("  Request timeout: {}s", config.request_timeout_secs);

    println!("\nExtraction Rules:");
    println!("  Container: {}", config.extraction.container_selector);
    println!("  Article pattern: {}", config.extraction.article_pattern);
    println!("  Title: {}", config.extraction.title_selector);

    println!("\nPages:");
    for page in config.start_page..=config.end_page {
        println!(
            "  {:>5}  {}",
            page,
            resolve_list_url(page, &config.base_url, config.first_page_override())
        );
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.db_path);

    let store = SqliteStore::open_with_schema(Path::new(&config.db_path))
        .with_context(|| format!("Failed to open database {}", config.db_path))?;
    let stats = load_statistics(&store, RECENT_LIMIT)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config) -> anyhow::Result<()> {
    tracing::info!("Listing template: {}", config.base_url);
    if let Some(first) = config.first_page_override() {
        tracing::info!("First page override: {}", first);
    }
    tracing::info!("Database: {}", config.db_path);

    match harvest(config).await {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["page-harvest"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("./config.yaml"));
        assert!(!cli.dry_run);
        assert!(!cli.stats);
    }

    #[test]
    fn test_explicit_config_and_flags() {
        let cli = Cli::try_parse_from(["page-harvest", "site.toml", "--dry-run", "-vv"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("site.toml"));
        assert!(cli.dry_run);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_dry_run_conflicts_with_stats() {
        assert!(Cli::try_parse_from(["page-harvest", "--dry-run", "--stats"]).is_err());
    }
}
