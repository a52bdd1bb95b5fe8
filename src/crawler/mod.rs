//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - Render-mode classification (server- vs client-rendered)
//! - Dual-mode fetching with a headless-browser fallback
//! - Link extraction and filtering
//! - Frontier scheduling with a bounded page budget

mod classifier;
mod extractor;
mod fetcher;
mod scheduler;

pub use classifier::needs_browser_render;
pub use extractor::extract_links;
pub use fetcher::{FetchedPage, PageFetcher};
pub use scheduler::{CrawlTask, ProgressFn, Scheduler};

use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::browser::ChromiumRenderer;
use crate::config::Config;
use crate::robots;
use crate::sitemap::{write_sitemap, SitemapEntry};
use crate::{Result, SitemapError};

/// Builds the HTTP client used for lightweight fetches and robots.txt
pub fn build_http_client(user_agent: &str) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Derives the crawl origin from a seed URL
///
/// The crawl always starts at the site root: scheme, host, and port are kept
/// and everything else is discarded.
fn crawl_origin(site_url: &str) -> Result<Url> {
    let parsed = Url::parse(site_url).map_err(|e| SitemapError::InvalidSeed {
        url: site_url.to_string(),
        message: e.to_string(),
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(SitemapError::InvalidSeed {
            url: site_url.to_string(),
            message: format!("unsupported scheme: {}", parsed.scheme()),
        });
    }

    if parsed.host_str().is_none() {
        return Err(SitemapError::InvalidSeed {
            url: site_url.to_string(),
            message: "missing host".to_string(),
        });
    }

    let origin = format!("{}/", parsed.origin().ascii_serialization());
    Url::parse(&origin).map_err(|e| SitemapError::InvalidSeed {
        url: site_url.to_string(),
        message: e.to_string(),
    })
}

/// Crawls a site and returns the recorded sitemap entries
///
/// This is the full pipeline: derive the origin, load robots.txt rules,
/// traverse the site through the dual-mode fetcher, and shut the browser
/// down on every exit path.
///
/// # Arguments
///
/// * `site_url` - Seed URL; the crawl origin is derived from it
/// * `config` - Crawl, classifier, and browser configuration
/// * `progress` - Optional per-page progress callback
///
/// # Errors
///
/// A malformed seed URL or a failed browser launch aborts the crawl.
/// Per-page failures only make the resulting sitemap smaller.
pub async fn crawl_site(
    site_url: &str,
    config: &Config,
    progress: Option<&ProgressFn>,
) -> Result<Vec<SitemapEntry>> {
    let origin = crawl_origin(site_url)?;
    tracing::info!("Starting crawl of {}", origin);

    let client = build_http_client(&config.crawler.user_agent)?;

    let rules = robots::fetch_disallowed(&client, &origin).await;

    let renderer = ChromiumRenderer::new(origin.clone(), config);
    let fetcher = PageFetcher::new(&client, &renderer, &config.render, &origin);
    let scheduler = Scheduler::new(
        origin.clone(),
        config.crawler.max_pages,
        config.crawler.concurrency,
    );

    let result = scheduler.run(&fetcher, &rules, progress).await;

    // The browser is closed whether the loop finished or a task dispatch
    // propagated an error.
    renderer.shutdown().await;

    let entries = result?;
    tracing::info!("Crawled {} pages", entries.len());
    Ok(entries)
}

/// Crawls a site and serializes the result into a sitemap document
///
/// # Example
///
/// ```no_run
/// use sitemapper::{generate_sitemap, Config};
///
/// # async fn example() -> sitemapper::Result<()> {
/// let config = Config::default();
/// let xml = generate_sitemap("https://example.com", &config, None).await?;
/// println!("{}", xml);
/// # Ok(())
/// # }
/// ```
pub async fn generate_sitemap(
    site_url: &str,
    config: &Config,
    progress: Option<&ProgressFn>,
) -> Result<String> {
    let entries = crawl_site(site_url, config, progress).await?;
    Ok(write_sitemap(&entries))
}
