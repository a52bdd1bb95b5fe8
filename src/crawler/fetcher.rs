//! Dual-mode page fetching
//!
//! Every page is first fetched over plain HTTP, which also captures its
//! `Last-Modified` header. When the classifier flags the document as
//! client-rendered, or the lightweight path yields zero links, the page is
//! fetched again through the shared headless browser and the two link sets
//! are unioned.
//!
//! Per-page failures are absorbed here: a transport error or navigation
//! timeout degrades the page to zero links with a last-modified of "now".
//! Only a browser launch failure escapes, because it dooms the whole crawl.

use chrono::{DateTime, Utc};
use reqwest::Client;
use scraper::Html;
use std::collections::HashSet;
use url::Url;

use crate::browser::{PageRenderer, RenderError};
use crate::config::RenderConfig;
use crate::crawler::classifier::needs_browser_render;
use crate::crawler::extractor::extract_links;
use crate::{Result, SitemapError};

/// Links and metadata collected for one crawled page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Outbound candidate links, deduplicated
    pub links: Vec<Url>,

    /// `Last-Modified` header value, or the fetch wall-clock time
    pub last_modified: DateTime<Utc>,
}

/// Fetches pages over HTTP with a browser-rendered fallback
pub struct PageFetcher<'a> {
    client: &'a Client,
    renderer: &'a dyn PageRenderer,
    render: &'a RenderConfig,
    origin: &'a Url,
}

impl<'a> PageFetcher<'a> {
    pub fn new(
        client: &'a Client,
        renderer: &'a dyn PageRenderer,
        render: &'a RenderConfig,
        origin: &'a Url,
    ) -> Self {
        Self {
            client,
            renderer,
            render,
            origin,
        }
    }

    /// Fetches a page and returns its outbound links and last-modified value
    ///
    /// # Errors
    ///
    /// Only a failed browser launch is returned as an error; every per-page
    /// failure is logged and absorbed.
    pub async fn fetch_page(&self, url: &Url) -> Result<FetchedPage> {
        let (body, last_modified) = match self.fetch_http(url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Fetch failed for {}: {}", url, e);
                return Ok(FetchedPage {
                    links: Vec::new(),
                    last_modified: Utc::now(),
                });
            }
        };

        let doc = Html::parse_document(&body);
        let client_rendered = needs_browser_render(&body, &doc, self.render);

        let mut links = if client_rendered {
            Vec::new()
        } else {
            extract_links(&doc, self.origin, url)
        };

        if client_rendered || links.is_empty() {
            if !client_rendered {
                tracing::debug!("No links via HTTP for {}, rendering in browser", url);
            }
            match self.renderer.render_links(url).await {
                Ok(rendered) => merge_links(&mut links, rendered),
                Err(RenderError::Launch(message)) => {
                    return Err(SitemapError::BrowserLaunch(message))
                }
                Err(e) => tracing::warn!("Browser render failed for {}: {}", url, e),
            }
        }

        Ok(FetchedPage {
            links,
            last_modified,
        })
    }

    async fn fetch_http(
        &self,
        url: &Url,
    ) -> std::result::Result<(String, DateTime<Utc>), reqwest::Error> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await?
            .error_for_status()?;

        let last_modified = response
            .headers()
            .get(reqwest::header::LAST_MODIFIED)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_http_date)
            .unwrap_or_else(Utc::now);

        let body = response.text().await?;

        Ok((body, last_modified))
    }
}

/// Parses an HTTP `Last-Modified` header value (RFC 2822 date)
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Appends rendered links to the lightweight set, skipping duplicates
fn merge_links(links: &mut Vec<Url>, rendered: Vec<Url>) {
    let mut seen: HashSet<String> = links.iter().map(|u| u.as_str().to_string()).collect();
    for link in rendered {
        if seen.insert(link.as_str().to_string()) {
            links.push(link);
        }
    }
}
