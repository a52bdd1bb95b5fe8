//! Line-oriented robots.txt parsing
//!
//! Only the wildcard (`User-agent: *`) group is honored; each non-empty
//! `Disallow:` value inside it becomes a path prefix.

/// Disallowed path prefixes derived from a site's robots.txt
///
/// Computed once per crawl and immutable thereafter. An empty rule set means
/// the crawl proceeds unrestricted.
#[derive(Debug, Clone, Default)]
pub struct DisallowedPaths {
    prefixes: Vec<String>,
}

impl DisallowedPaths {
    /// Creates an empty rule set (no restrictions)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses raw robots.txt content into a rule set
    ///
    /// Directive names are matched case-insensitively. Every `User-agent`
    /// line starts a new group; only `Disallow` lines while the wildcard
    /// group is active are collected.
    pub fn from_content(content: &str) -> Self {
        let mut prefixes = Vec::new();
        let mut wildcard_group = false;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = trimmed.split_once(':') {
                let value = value.trim();
                match key.trim().to_lowercase().as_str() {
                    "user-agent" => {
                        wildcard_group = value == "*";
                    }
                    "disallow" => {
                        if wildcard_group && !value.is_empty() {
                            prefixes.push(value.to_string());
                        }
                    }
                    _ => {}
                }
            }
        }

        Self { prefixes }
    }

    /// Checks whether a URL path falls under a disallowed prefix
    ///
    /// A prefix matches the path itself and anything below it at a
    /// path-segment boundary: `/admin` blocks `/admin` and `/admin/users`
    /// but not `/admin2`.
    pub fn is_disallowed(&self, path: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| prefix_matches(path, prefix))
    }

    /// Returns the number of disallow rules
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Returns whether the rule set is empty
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

fn prefix_matches(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}
