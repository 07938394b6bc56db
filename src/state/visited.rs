use std::collections::HashSet;
use url::Url;

/// Ledger of URLs already processed or scheduled in this run
///
/// Keys are the canonical string form of a URL (fragment removed). The set only grows;
/// it lives as long as the controller that owns it.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    visited: HashSet<String>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical key for a URL
    pub fn key(url: &Url) -> String {
        let mut url = url.clone();
        url.set_fragment(None);
        url.into()
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(&Self::key(url))
    }

    pub fn mark_visited(&mut self, url: &Url) {
        self.visited.insert(Self::key(url));
    }

    /// Test-and-set: marks the URL and returns true if it was not visited before
    pub fn check_and_mark(&mut self, url: &Url) -> bool {
        self.visited.insert(Self::key(url))
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_starts_empty() {
        let registry = VisitedRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.is_visited(&url("https://a.example/")));
    }

    #[test]
    fn test_mark_and_check() {
        let mut registry = VisitedRegistry::new();
        let page = url("https://a.example/page.html");

        registry.mark_visited(&page);

        assert!(registry.is_visited(&page));
        assert!(!registry.is_visited(&url("https://a.example/other.html")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_check_and_mark_is_test_and_set() {
        let mut registry = VisitedRegistry::new();
        let page = url("https://a.example/page.html");

        assert!(registry.check_and_mark(&page));
        assert!(!registry.check_and_mark(&page));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_fragment_is_ignored() {
        let mut registry = VisitedRegistry::new();
        registry.mark_visited(&url("https://a.example/page.html#intro"));

        assert!(registry.is_visited(&url("https://a.example/page.html")));
        assert!(registry.is_visited(&url("https://a.example/page.html#other")));
    }

    #[test]
    fn test_query_is_significant() {
        let mut registry = VisitedRegistry::new();
        registry.mark_visited(&url("https://a.example/list?page=1"));

        assert!(!registry.is_visited(&url("https://a.example/list?page=2")));
    }
}
