//! Sitemapper command-line entry point

use anyhow::Context;
use clap::Parser;
use sitemapper::config::{load_config, validate};
use sitemapper::{generate_sitemap, Config, ProgressFn};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitemapper: XML sitemap generation for live websites
///
/// Crawls same-origin pages breadth-first, rendering client-side
/// applications in a headless browser when plain HTTP yields no links, and
/// emits a sitemaps.org 0.9 document.
#[derive(Parser, Debug)]
#[command(name = "sitemapper")]
#[command(version = "1.0.0")]
#[command(about = "Generates an XML sitemap for a website", long_about = None)]
struct Cli {
    /// Site URL to crawl (the origin is derived from it)
    #[arg(value_name = "URL")]
    url: String,

    /// Maximum number of pages recorded in the sitemap
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Number of pages fetched concurrently
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Write the sitemap to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to a TOML file with classifier thresholds and timeouts
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    validate(&config)?;

    tracing::info!(
        "Generating sitemap for {} (budget: {} pages, width: {})",
        cli.url,
        config.crawler.max_pages,
        config.crawler.concurrency
    );

    let progress: &ProgressFn = &|url, count| {
        tracing::info!("[{}] {}", count, url);
    };

    let xml = generate_sitemap(&cli.url, &config, Some(progress)).await?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &xml)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Sitemap written to {}", path.display());
        }
        None => {
            println!("{}", xml);
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemapper=info,warn"),
            1 => EnvFilter::new("sitemapper=debug,info"),
            2 => EnvFilter::new("sitemapper=trace,debug"),
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
