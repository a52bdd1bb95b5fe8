//! Sitemap document assembly
//!
//! Converts the per-page metadata accumulated during a crawl into a
//! sitemaps.org 0.9 XML document.

use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

/// Per-page record accumulated during the crawl
///
/// Created exactly once, when a page finishes crawling; entries are kept in
/// completion order and the serializer never reorders or drops them.
#[derive(Debug, Clone)]
pub struct SitemapEntry {
    /// The page URL
    pub url: Url,

    /// Value of the `Last-Modified` response header, or the fetch wall-clock
    /// time when the header was absent
    pub last_modified: DateTime<Utc>,

    /// Crawl priority in [0.1, 1.0], derived from depth
    pub priority: f64,
}

/// Derives a page's sitemap priority from its crawl depth
///
/// The seed is 1.0 and each level below it loses 0.1, rounded to one decimal
/// place and clamped to 0.1.
///
/// # Examples
///
/// ```
/// use sitemapper::priority_for_depth;
///
/// assert_eq!(priority_for_depth(0), 1.0);
/// assert_eq!(priority_for_depth(5), 0.5);
/// assert_eq!(priority_for_depth(20), 0.1);
/// ```
pub fn priority_for_depth(depth: u32) -> f64 {
    let priority = 1.0 - f64::from(depth) * 0.1;
    let rounded = (priority * 10.0).round() / 10.0;
    rounded.max(0.1)
}

/// Serializes recorded entries into a sitemap document
///
/// Pure function of its input: serializing the same entries twice yields
/// byte-identical XML.
///
/// # Arguments
///
/// * `entries` - The recorded pages, in completion order
///
/// # Returns
///
/// A UTF-8 XML document with one `<url>` element per entry
pub fn write_sitemap(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(entry.url.as_str())
        ));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            entry
                .last_modified
                .to_rfc3339_opts(SecondsFormat::Millis, true)
        ));
        xml.push_str(&format!(
            "    <priority>{:.1}</priority>\n",
            entry.priority
        ));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>");
    xml
}

/// Escapes XML-reserved characters in element text
fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(url: &str, timestamp: i64, priority: f64) -> SitemapEntry {
        SitemapEntry {
            url: Url::parse(url).unwrap(),
            last_modified: Utc.timestamp_opt(timestamp, 0).unwrap(),
            priority,
        }
    }

    #[test]
    fn test_priority_at_seed() {
        assert_eq!(priority_for_depth(0), 1.0);
    }

    #[test]
    fn test_priority_decreases_with_depth() {
        assert_eq!(priority_for_depth(1), 0.9);
        assert_eq!(priority_for_depth(3), 0.7);
        assert_eq!(priority_for_depth(5), 0.5);
        assert_eq!(priority_for_depth(9), 0.1);
    }

    #[test]
    fn test_priority_clamped_at_floor() {
        assert_eq!(priority_for_depth(10), 0.1);
        assert_eq!(priority_for_depth(20), 0.1);
        assert_eq!(priority_for_depth(1000), 0.1);
    }

    #[test]
    fn test_priority_rounds_to_one_decimal() {
        // 1.0 - 0.3 is not exactly 0.3 in binary floating point
        let priority = priority_for_depth(3);
        assert_eq!(format!("{:.1}", priority), "0.7");
    }

    #[test]
    fn test_empty_sitemap() {
        let xml = write_sitemap(&[]);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
        assert!(xml.ends_with("</urlset>"));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn test_single_entry() {
        let entries = vec![entry("https://example.com/", 1_700_000_000, 1.0)];
        let xml = write_sitemap(&entries);

        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains("<lastmod>2023-11-14T22:13:20.000Z</lastmod>"));
        assert!(xml.contains("<priority>1.0</priority>"));
    }

    #[test]
    fn test_entries_keep_recorded_order() {
        let entries = vec![
            entry("https://example.com/b", 0, 0.9),
            entry("https://example.com/a", 0, 0.8),
        ];
        let xml = write_sitemap(&entries);

        let pos_b = xml.find("https://example.com/b").unwrap();
        let pos_a = xml.find("https://example.com/a").unwrap();
        assert!(pos_b < pos_a);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let entries = vec![
            entry("https://example.com/", 1_700_000_000, 1.0),
            entry("https://example.com/about", 1_700_000_100, 0.9),
        ];
        assert_eq!(write_sitemap(&entries), write_sitemap(&entries));
    }

    #[test]
    fn test_lastmod_millisecond_utc_format() {
        let entries = vec![SitemapEntry {
            url: Url::parse("https://example.com/").unwrap(),
            last_modified: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
            priority: 1.0,
        }];
        let xml = write_sitemap(&entries);
        assert!(xml.contains("<lastmod>2023-11-14T22:13:20.123Z</lastmod>"));
    }

    #[test]
    fn test_query_string_ampersand_escaped() {
        let entries = vec![entry("https://example.com/page?a=1&b=2", 0, 0.5)];
        let xml = write_sitemap(&entries);
        assert!(xml.contains("<loc>https://example.com/page?a=1&amp;b=2</loc>"));
    }
}
