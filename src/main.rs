//! Lantern Crawl main entry point
//!
//! This is the command-line interface for the Lantern single-site crawler.

use anyhow::Context;
use clap::Parser;
use lantern_crawl::config::{load_config_with_hash, Config};
use lantern_crawl::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Lantern Crawl: a breadth-first single-site crawler
///
/// Lantern walks one site outward from its seed pages, classifies each page
/// by URL and stores one record per page until the site runs out, the record
/// cap is reached, or the run timeout fires.
#[derive(Parser, Debug)]
#[command(name = "lantern-crawl")]
#[command(version)]
#[command(about = "A breadth-first single-site crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the number of workers
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Override the total record cap
    #[arg(long, value_name = "N")]
    max_records: Option<u64>,

    /// Override the run timeout in seconds
    #[arg(long, value_name = "SECS")]
    run_timeout: Option<u64>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lantern_crawl=info,warn"),
            1 => EnvFilter::new("lantern_crawl=debug,info"),
            2 => EnvFilter::new("lantern_crawl=trace,debug"),
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

/// Applies command-line overrides, then re-validates the result
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(max_records) = cli.max_records {
        config.crawler.max_records = max_records;
    }
    if let Some(run_timeout) = cli.run_timeout {
        config.crawler.run_timeout_secs = run_timeout;
    }

    lantern_crawl::config::validate(config).context("invalid command-line override")?;
    Ok(())
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Lantern Crawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Queue capacity: {}", config.crawler.queue_capacity);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Run timeout: {}s", config.crawler.run_timeout_secs);
    println!("  Record cap: {}", config.crawler.max_records);
    println!("  Monitor interval: {}s", config.crawler.monitor_interval_secs);

    println!("\nSite:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Article prefix: {}", config.site.article_prefix);
    println!("  Title suffix: {:?}", config.site.title_suffix);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nClassifier ({} rules):", config.classifier.rules.len());
    for rule in &config.classifier.rules {
        println!("  - {}: {}", rule.label, rule.keywords.join(", "));
    }
    println!("  - (default): {}", config.classifier.default);

    println!("\nSeeds ({}):", config.site.seeds.len());
    for seed in &config.site.seeds {
        println!("  * {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use lantern_crawl::output::{load_statistics, print_statistics};
    use lantern_crawl::storage::open_storage;
    use std::path::Path;

    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: String) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} from {} seed URLs",
        config.site.base_url,
        config.site.seeds.len()
    );

    let summary = crawl(config, config_hash).await.context("crawl failed")?;
    println!("{}", summary);

    Ok(())
}
