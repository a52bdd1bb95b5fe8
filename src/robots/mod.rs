//! Robots.txt handling module
//!
//! Fetches and parses the crawl origin's robots.txt into a set of disallowed
//! path prefixes. Failure to obtain the file is never fatal: the crawl simply
//! proceeds unrestricted.

mod parser;

pub use parser::DisallowedPaths;

use reqwest::Client;
use url::Url;

/// Fetches and parses robots.txt for the crawl origin
///
/// Any failure - a 404, another non-2xx status, or a transport error -
/// degrades to an empty rule set.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `origin` - The crawl origin URL
///
/// # Returns
///
/// The disallowed path prefixes declared for the wildcard user-agent
pub async fn fetch_disallowed(client: &Client, origin: &Url) -> DisallowedPaths {
    let robots_url = match origin.join("/robots.txt") {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Failed to build robots.txt URL for {}: {}", origin, e);
            return DisallowedPaths::empty();
        }
    };

    tracing::debug!("Fetching robots.txt from: {}", robots_url);

    match client.get(robots_url.as_str()).send().await {
        Ok(response) if response.status().is_success() => match response.text().await {
            Ok(body) => {
                let rules = DisallowedPaths::from_content(&body);
                tracing::info!("Found {} disallow rules", rules.len());
                rules
            }
            Err(e) => {
                tracing::warn!("Failed to read robots.txt body: {}", e);
                DisallowedPaths::empty()
            }
        },
        Ok(response) => {
            tracing::debug!(
                "No usable robots.txt (status {}), crawling all pages",
                response.status()
            );
            DisallowedPaths::empty()
        }
        Err(e) => {
            tracing::warn!("Failed to fetch robots.txt: {}", e);
            DisallowedPaths::empty()
        }
    }
}
