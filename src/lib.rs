//! Sitemapper: a dual-mode website sitemap generator
//!
//! This crate crawls every reachable same-origin page of a target website,
//! detecting client-rendered pages and fetching those through a shared
//! headless browser, then emits a sitemaps.org-compliant XML document.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod robots;
pub mod sitemap;

use thiserror::Error;

/// Main error type for sitemapper operations
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL {url}: {message}")]
    InvalidSeed { url: String, message: String },

    #[error("Failed to launch browser: {0}")]
    BrowserLaunch(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for sitemapper operations
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl_site, generate_sitemap, ProgressFn};
pub use sitemap::{priority_for_depth, write_sitemap, SitemapEntry};
