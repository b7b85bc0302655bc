//! Tatce crawler main entry point
//!
//! This is the command-line interface for the tatce.cz news harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tatce_crawler::config::{load_config_with_hash, load_default_config, Config};
use tatce_crawler::crawler::{run_crawl, InterruptSignal};
use tatce_crawler::output::{print_statistics, CrawlStatistics};
use tracing_subscriber::EnvFilter;

/// Tatce crawler: news harvester for tatce.cz
///
/// Walks the paginated news listing, extracts every article and runs OCR on
/// its inline image and linked PDFs and images, then saves everything as a
/// JSON document. Ctrl-C stops the crawl and saves what was collected.
#[derive(Parser, Debug)]
#[command(name = "tatce-crawler")]
#[command(version = "1.0.0")]
#[command(about = "News harvester for tatce.cz with OCR of attachments", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (default: ./tatce-crawler.toml if present)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_ref())?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let interrupt = InterruptSignal::new();
    interrupt.listen_for_ctrl_c();

    let report = run_crawl(config, interrupt)
        .await
        .context("Crawl could not be started")?;

    print_statistics(&CrawlStatistics::from_report(&report));
    Ok(())
}

/// Sets up the logging/tracing subscriber
///
/// `RUST_LOG` takes precedence over the verbosity flags.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if quiet => EnvFilter::new("error"),
        Err(_) => match verbose {
            0 => EnvFilter::new("tatce_crawler=info,warn"),
            1 => EnvFilter::new("tatce_crawler=debug,info"),
            _ => EnvFilter::new("tatce_crawler=trace,debug"),
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration from the given path or the working directory
fn load_configuration(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            let cwd = std::env::current_dir().context("Cannot determine working directory")?;
            let (config, hash) =
                load_default_config(&cwd).context("Failed to load default configuration")?;
            match hash {
                Some(hash) => tracing::info!("Configuration loaded from working directory (hash: {})", hash),
                None => tracing::info!("No configuration file given, using built-in defaults"),
            }
            Ok(config)
        }
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Tatce Crawler Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Listing path: {}", config.site.listing_path);

    println!("\nCrawler Configuration:");
    println!("  Max articles: {}", config.crawler.max_articles);
    println!("  Article delay: {}ms", config.crawler.article_delay_ms);
    println!("  Listing delay: {}ms", config.crawler.listing_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nOCR:");
    println!("  Endpoint: {}", config.ocr.endpoint);
    println!("  Language: {}", config.ocr.language);
    println!("  Engine: {}", config.ocr.engine);
    if config.ocr.uses_shared_key() {
        println!("  Shared API key, calls paced every {}ms", config.ocr.pacing_ms);
    }

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!(
        "  File: {}.{} (numbered if taken)",
        config.output.base_name, config.output.extension
    );

    println!("\n✓ Configuration is valid");
}
