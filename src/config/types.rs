use serde::Deserialize;

/// Main configuration structure for sitemapper
///
/// Every field has a default, so an empty configuration file (or no file at
/// all) yields a working crawl setup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages recorded in the sitemap
    #[serde(rename = "max-pages", default = "defaults::max_pages")]
    pub max_pages: usize,

    /// Number of pages fetched concurrently within a batch
    #[serde(default = "defaults::concurrency")]
    pub concurrency: usize,

    /// User agent sent with lightweight HTTP requests
    #[serde(rename = "user-agent", default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: defaults::max_pages(),
            concurrency: defaults::concurrency(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Threshold bundle consumed by the render-mode classifier
///
/// Passed by value into the classifier; immutable for the duration of a
/// crawl so boundary-value configs can be tested deterministically.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Documents shorter than this are assumed to be client-rendered shells
    #[serde(rename = "min-content-length", default = "defaults::min_content_length")]
    pub min_content_length: usize,

    /// Minimum number of body child nodes expected of a server-rendered page
    #[serde(rename = "min-body-children", default = "defaults::min_body_children")]
    pub min_body_children: usize,

    /// Script-element counts above this suggest a bundle-driven page
    #[serde(rename = "script-count-threshold", default = "defaults::script_count_threshold")]
    pub script_count_threshold: usize,

    /// Floor for the document-length-per-script-tag ratio
    #[serde(rename = "content-script-ratio", default = "defaults::content_script_ratio")]
    pub content_script_ratio: usize,

    /// Mount-point selectors used by client-rendering frameworks
    #[serde(rename = "root-selectors", default = "defaults::root_selectors")]
    pub root_selectors: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            min_content_length: defaults::min_content_length(),
            min_body_children: defaults::min_body_children(),
            script_count_threshold: defaults::script_count_threshold(),
            content_script_ratio: defaults::content_script_ratio(),
            root_selectors: defaults::root_selectors(),
        }
    }
}

/// Headless browser timeouts
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Upper bound for page navigation and load (milliseconds)
    #[serde(rename = "navigation-timeout-ms", default = "defaults::navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Upper bound for the post-load selector wait (milliseconds)
    ///
    /// Expiry of this wait is not an error; link collection proceeds with
    /// whatever the DOM holds at that point.
    #[serde(rename = "selector-timeout-ms", default = "defaults::selector_timeout_ms")]
    pub selector_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: defaults::navigation_timeout_ms(),
            selector_timeout_ms: defaults::selector_timeout_ms(),
        }
    }
}

mod defaults {
    pub fn max_pages() -> usize {
        100
    }

    pub fn concurrency() -> usize {
        2
    }

    pub fn user_agent() -> String {
        "sitemapper/1.0".to_string()
    }

    pub fn min_content_length() -> usize {
        200
    }

    pub fn min_body_children() -> usize {
        5
    }

    pub fn script_count_threshold() -> usize {
        10
    }

    pub fn content_script_ratio() -> usize {
        1000
    }

    pub fn root_selectors() -> Vec<String> {
        vec!["#root".to_string(), "#__next".to_string()]
    }

    pub fn navigation_timeout_ms() -> u64 {
        60_000
    }

    pub fn selector_timeout_ms() -> u64 {
        10_000
    }
}
