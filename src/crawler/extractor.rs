//! Outbound link extraction and filtering
//!
//! Given a parsed document, the crawl origin, and the page's own URL, this
//! module produces the deduplicated set of candidate links worth queueing:
//! same-origin content pages, fragments stripped, self-links and non-document
//! resources excluded. Malformed hrefs are silently discarded.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// File extensions that never identify crawlable HTML documents
const SKIP_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".pdf", ".zip", ".css", ".js", ".webp", ".svg", ".ico",
    ".mp4", ".mp3", ".avif",
];

/// Extracts candidate links from a parsed document
///
/// # Arguments
///
/// * `doc` - The parsed DOM tree
/// * `origin` - The crawl origin; links outside it are dropped
/// * `page_url` - The page the document was fetched from; relative hrefs
///   resolve against it and self-links are excluded
///
/// # Returns
///
/// Deduplicated absolute URLs, in document order
pub fn extract_links(doc: &Html, origin: &Url, page_url: &Url) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in doc.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(link) = resolve_candidate(href, origin, page_url) {
                    if seen.insert(link.as_str().to_string()) {
                        links.push(link);
                    }
                }
            }
        }
    }

    links
}

/// Resolves an href to an accepted candidate URL, or None to discard it
fn resolve_candidate(href: &str, origin: &Url, page_url: &Url) -> Option<Url> {
    let mut link = page_url.join(href.trim()).ok()?;

    // Non-HTTP schemes (javascript:, mailto:, data:) produce opaque origins
    // and never compare equal to the crawl origin.
    if link.origin() != origin.origin() {
        return None;
    }

    link.set_fragment(None);

    if link.path() == page_url.path() {
        return None;
    }

    if is_skipped_resource(link.as_str()) {
        return None;
    }

    Some(link)
}

/// Checks a URL against the non-document extension denylist
fn is_skipped_resource(url: &str) -> bool {
    let lower = url.to_lowercase();
    SKIP_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://x.com/").unwrap()
    }

    fn extract(html: &str, page: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        let page_url = Url::parse(page).unwrap();
        extract_links(&doc, &origin(), &page_url)
            .into_iter()
            .map(|u| u.to_string())
            .collect()
    }

    #[test]
    fn test_relative_link_resolved_and_fragment_stripped() {
        let links = extract(
            r#"<html><body><a href="/foo#bar">Foo</a></body></html>"#,
            "https://x.com/",
        );
        assert_eq!(links, vec!["https://x.com/foo"]);
    }

    #[test]
    fn test_denylisted_extension_excluded() {
        let links = extract(
            r#"<html><body><a href="image.png">Pic</a><a href="/page">Page</a></body></html>"#,
            "https://x.com/",
        );
        assert_eq!(links, vec!["https://x.com/page"]);
    }

    #[test]
    fn test_extension_check_is_case_insensitive() {
        let links = extract(
            r#"<html><body><a href="/photo.JPG">Pic</a></body></html>"#,
            "https://x.com/",
        );
        assert!(links.is_empty());
    }

    #[test]
    fn test_cross_host_link_excluded() {
        let links = extract(
            r#"<html><body><a href="https://other.com/page">Other</a></body></html>"#,
            "https://x.com/",
        );
        assert!(links.is_empty());
    }

    #[test]
    fn test_self_link_excluded() {
        let links = extract(
            r#"<html><body><a href="/about?tab=2">Self</a></body></html>"#,
            "https://x.com/about",
        );
        assert!(links.is_empty());
    }

    #[test]
    fn test_fragment_only_link_is_self_link() {
        let links = extract(
            r##"<html><body><a href="#section">Jump</a></body></html>"##,
            "https://x.com/page",
        );
        assert!(links.is_empty());
    }

    #[test]
    fn test_special_schemes_excluded() {
        let html = r#"<html><body>
            <a href="javascript:void(0)">JS</a>
            <a href="mailto:hi@x.com">Mail</a>
            <a href="tel:+123">Call</a>
            <a href="/real">Real</a>
        </body></html>"#;
        let links = extract(html, "https://x.com/");
        assert_eq!(links, vec!["https://x.com/real"]);
    }

    #[test]
    fn test_duplicate_links_deduplicated() {
        let html = r#"<html><body>
            <a href="/page">One</a>
            <a href="/page#top">Two</a>
            <a href="/page">Three</a>
        </body></html>"#;
        let links = extract(html, "https://x.com/");
        assert_eq!(links, vec!["https://x.com/page"]);
    }

    #[test]
    fn test_relative_path_resolves_against_page() {
        let links = extract(
            r#"<html><body><a href="sibling">Link</a></body></html>"#,
            "https://x.com/docs/intro",
        );
        assert_eq!(links, vec!["https://x.com/docs/sibling"]);
    }

    #[test]
    fn test_scheme_mismatch_excluded() {
        let links = extract(
            r#"<html><body><a href="http://x.com/insecure">Link</a></body></html>"#,
            "https://x.com/",
        );
        assert!(links.is_empty());
    }

    #[test]
    fn test_malformed_href_discarded() {
        let html = r#"<html><body>
            <a href="https://[broken">Bad</a>
            <a href="/fine">Fine</a>
        </body></html>"#;
        let links = extract(html, "https://x.com/");
        assert_eq!(links, vec!["https://x.com/fine"]);
    }

    #[test]
    fn test_document_order_preserved() {
        let html = r#"<html><body>
            <a href="/c">C</a>
            <a href="/a">A</a>
            <a href="/b">B</a>
        </body></html>"#;
        let links = extract(html, "https://x.com/");
        assert_eq!(
            links,
            vec!["https://x.com/c", "https://x.com/a", "https://x.com/b"]
        );
    }
}
