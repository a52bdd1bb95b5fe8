//! Render-mode classification heuristics
//!
//! Inspects a fetched document and decides whether its meaningful content -
//! links included - was produced server-side, or whether a full browser
//! render is needed to see it. The decision is a disjunction of four
//! heuristics; any single one flags the page as client-rendered.
//!
//! This is a best-effort signal, not a guarantee. A false negative (a page
//! classified as server-rendered that actually carries no links) is caught
//! downstream by the fetcher's zero-links fallback.

use crate::config::RenderConfig;
use scraper::{Html, Selector};

/// Marker substrings that suggest a client-rendered loading shell
const LOADING_MARKERS: &[&str] = &["loading", "spinner"];

/// Decides whether a page requires a browser render to expose its links
///
/// # Arguments
///
/// * `html` - The raw document text
/// * `doc` - The parsed DOM tree of the same document
/// * `config` - The classifier thresholds
///
/// # Returns
///
/// * `true` - The page looks client-rendered; fetch it through the browser
/// * `false` - The page looks server-rendered
pub fn needs_browser_render(html: &str, doc: &Html, config: &RenderConfig) -> bool {
    let is_short = html.len() < config.min_content_length;

    let sparse_body = body_child_count(doc) < config.min_body_children;

    let many_scripts = count_elements(doc, "script") > config.script_count_threshold;

    // The ratio denominator counts raw "<script" occurrences, so inline and
    // external scripts weigh the same.
    let raw_script_tags = html.matches("<script").count().max(1);
    let low_content_ratio = html.len() / raw_script_tags < config.content_script_ratio;

    let has_root_marker = config.root_selectors.iter().any(|selector| {
        Selector::parse(selector)
            .map(|s| doc.select(&s).next().is_some())
            .unwrap_or(false)
    });

    let has_loading_marker = LOADING_MARKERS.iter().any(|marker| html.contains(marker));

    is_short
        || (has_root_marker && (sparse_body || has_loading_marker))
        || (sparse_body && many_scripts)
        || (low_content_ratio && has_root_marker)
}

/// Counts the child nodes (elements and text alike) of the document body
fn body_child_count(doc: &Html) -> usize {
    match Selector::parse("body") {
        Ok(selector) => doc
            .select(&selector)
            .next()
            .map(|body| body.children().count())
            .unwrap_or(0),
        Err(_) => 0,
    }
}

fn count_elements(doc: &Html, name: &str) -> usize {
    match Selector::parse(name) {
        Ok(selector) => doc.select(&selector).count(),
        Err(_) => 0,
    }
}
