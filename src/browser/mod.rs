//! Headless browser rendering capability
//!
//! Client-rendered pages only expose their links after script execution, so
//! the fetcher falls back to a real browser for them. The capability is
//! modeled as the [`PageRenderer`] trait so crawl-logic tests can substitute
//! a stub instead of depending on an installed Chromium.
//!
//! A single browser process is launched lazily on first need and shared by
//! all concurrent fetch tasks; each task opens its own tab and closes it when
//! done, and the process itself is closed when the crawl ends.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use url::Url;

use crate::config::Config;

/// Errors surfaced by a [`PageRenderer`]
#[derive(Debug, Error)]
pub enum RenderError {
    /// The browser process could not be started. Fatal to the crawl: without
    /// it, client-rendered pages cannot be discovered.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// Navigation failed or timed out for a single page. Non-fatal.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// The in-page link collection routine failed. Non-fatal.
    #[error("script evaluation failed: {0}")]
    Evaluate(String),
}

/// Capability interface for browser-rendered link collection
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Navigates to `url` in a fresh tab and returns every same-origin link
    /// present in the rendered DOM, fragments stripped
    async fn render_links(&self, url: &Url) -> Result<Vec<Url>, RenderError>;
}

/// [`PageRenderer`] backed by a shared headless Chromium process
pub struct ChromiumRenderer {
    browser: OnceCell<Browser>,
    handler_task: std::sync::Mutex<Option<tokio::task::JoinHandle<()>>>,
    origin: Url,
    root_selectors: Vec<String>,
    navigation_timeout: Duration,
    selector_timeout: Duration,
}

impl ChromiumRenderer {
    /// Creates a renderer for the given crawl origin
    ///
    /// No browser process is started here; that happens on the first
    /// [`PageRenderer::render_links`] call.
    pub fn new(origin: Url, config: &Config) -> Self {
        Self {
            browser: OnceCell::new(),
            handler_task: std::sync::Mutex::new(None),
            origin,
            root_selectors: config.render.root_selectors.clone(),
            navigation_timeout: Duration::from_millis(config.browser.navigation_timeout_ms),
            selector_timeout: Duration::from_millis(config.browser.selector_timeout_ms),
        }
    }

    /// Returns the shared browser, launching it on first use
    async fn browser(&self) -> Result<&Browser, RenderError> {
        self.browser
            .get_or_try_init(|| async {
                let browser_config = BrowserConfig::builder()
                    .build()
                    .map_err(RenderError::Launch)?;

                let (browser, mut handler) = Browser::launch(browser_config)
                    .await
                    .map_err(|e| RenderError::Launch(e.to_string()))?;

                // The CDP event handler must be polled for the browser
                // connection to make progress.
                let task = tokio::spawn(async move {
                    while handler.next().await.is_some() {}
                });
                if let Ok(mut slot) = self.handler_task.lock() {
                    *slot = Some(task);
                }

                tracing::info!("Launched headless browser");
                Ok(browser)
            })
            .await
    }

    /// Closes the shared browser process, if one was ever launched
    ///
    /// Called by the crawl loop on every exit path, successful or not.
    pub async fn shutdown(self) {
        if let Some(mut browser) = self.browser.into_inner() {
            if let Err(e) = browser.close().await {
                tracing::warn!("Failed to close browser: {}", e);
            } else if let Err(e) = browser.wait().await {
                tracing::debug!("Browser did not exit cleanly: {}", e);
            }
        }

        if let Ok(mut slot) = self.handler_task.lock() {
            if let Some(task) = slot.take() {
                task.abort();
            }
        }
    }

    async fn collect_links(&self, page: &Page, url: &Url) -> Result<Vec<Url>, RenderError> {
        let navigate = async {
            page.goto(url.as_str())
                .await
                .map_err(|e| RenderError::Navigation(e.to_string()))?;
            page.wait_for_navigation()
                .await
                .map_err(|e| RenderError::Navigation(e.to_string()))?;
            Ok::<(), RenderError>(())
        };
        tokio::time::timeout(self.navigation_timeout, navigate)
            .await
            .map_err(|_| {
                RenderError::Navigation(format!(
                    "timed out after {:?} loading {}",
                    self.navigation_timeout, url
                ))
            })??;

        self.wait_for_selectors(page, url).await;

        let hrefs: Vec<String> = page
            .evaluate(collect_links_script(&self.origin))
            .await
            .map_err(|e| RenderError::Evaluate(e.to_string()))?
            .into_value()
            .map_err(|e| RenderError::Evaluate(e.to_string()))?;

        Ok(hrefs
            .iter()
            .filter_map(|href| Url::parse(href).ok())
            .collect())
    }

    /// Waits for an anchor or a framework mount point to appear
    ///
    /// Expiry is not an error: collection proceeds with whatever links the
    /// DOM holds at that point.
    async fn wait_for_selectors(&self, page: &Page, url: &Url) {
        let mut selectors = vec!["a".to_string()];
        selectors.extend(self.root_selectors.iter().cloned());
        let selector = selectors.join(", ");

        let poll = async {
            while page.find_element(selector.as_str()).await.is_err() {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        };

        if tokio::time::timeout(self.selector_timeout, poll)
            .await
            .is_err()
        {
            tracing::debug!("Timed out waiting for \"{}\" on {}", selector, url);
        }
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn render_links(&self, url: &Url) -> Result<Vec<Url>, RenderError> {
        let browser = self.browser().await?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Navigation(e.to_string()))?;

        let result = self.collect_links(&page, url).await;

        // The tab is closed whatever the outcome; a failed close leaks it
        // only until browser shutdown.
        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close tab for {}: {}", url, e);
        }

        result
    }
}

/// Builds the in-page routine that collects same-origin anchor targets
///
/// Hrefs resolve against the page's own location; fragments are stripped
/// before deduplication.
fn collect_links_script(origin: &Url) -> String {
    format!(
        r#"(() => {{
    const urls = new Set();
    for (const anchor of document.querySelectorAll('a[href]')) {{
        try {{
            const resolved = new URL(anchor.getAttribute('href'), window.location.href);
            if (resolved.origin === '{origin}') {{
                resolved.hash = '';
                urls.add(resolved.href);
            }}
        }} catch (_) {{}}
    }}
    return Array.from(urls);
}})()"#,
        origin = origin.origin().ascii_serialization()
    )
}
