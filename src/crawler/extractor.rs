//! HTML link extraction
//!
//! Finds every resource an HTML page references so it can be mirrored too:
//! hyperlinks, stylesheets, scripts and images.

use scraper::{Html, Selector};
use url::Url;

/// Category of a discovered reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// `<a href="...">`
    Anchor,
    /// `<link rel="stylesheet" href="...">`
    Stylesheet,
    /// `<script src="...">`
    Script,
    /// `<img src="...">`
    Image,
}

impl LinkKind {
    /// All categories, in the order their links are emitted
    pub const ALL: [LinkKind; 4] = [Self::Anchor, Self::Stylesheet, Self::Script, Self::Image];

    fn selector(&self) -> &'static str {
        match self {
            Self::Anchor => "a[href]",
            Self::Stylesheet => "link[rel~='stylesheet'][href]",
            Self::Script => "script[src]",
            Self::Image => "img[src]",
        }
    }

    fn attribute(&self) -> &'static str {
        match self {
            Self::Anchor | Self::Stylesheet => "href",
            Self::Script | Self::Image => "src",
        }
    }
}

/// A resolved reference together with the tag category it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLink {
    pub url: Url,
    pub kind: LinkKind,
}

/// Extracts all references from an HTML document as absolute URLs
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">`
/// - `<link rel="stylesheet" href="...">`
/// - `<script src="...">`
/// - `<img src="...">`
///
/// **Exclude:**
/// - Anchors whose href starts with `#` (same-page fragments)
/// - Empty or whitespace-only attributes
/// - References that fail to resolve, or resolve to a non-HTTP(S) scheme
///
/// Fragments are stripped from the resolved URLs. Duplicates are kept; callers dedup.
///
/// # Example
///
/// ```
/// use site_mirror::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><img src="../img.png"></body></html>"#;
/// let base = Url::parse("https://site.test/dir/page.html").unwrap();
/// let links = extract_links(html, &base);
/// assert_eq!(links[0].as_str(), "https://site.test/img.png");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    extract_tagged_links(html, base_url)
        .into_iter()
        .map(|link| link.url)
        .collect()
}

/// Like [`extract_links`] but keeps the category of each reference
pub fn extract_tagged_links(html: &str, base_url: &Url) -> Vec<ExtractedLink> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for kind in LinkKind::ALL {
        let Ok(selector) = Selector::parse(kind.selector()) else {
            continue;
        };

        for element in document.select(&selector) {
            let Some(value) = element.value().attr(kind.attribute()) else {
                continue;
            };

            if kind == LinkKind::Anchor && value.trim_start().starts_with('#') {
                continue;
            }

            if let Some(url) = resolve_link(value, base_url) {
                links.push(ExtractedLink { url, kind });
            }
        }
    }

    links
}

/// Resolves a reference against the page URL
///
/// Returns None for empty references, unparseable results and non-HTTP(S) targets.
fn resolve_link(reference: &str, base_url: &Url) -> Option<Url> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    let mut absolute = base_url.join(reference).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    absolute.set_fragment(None);
    Some(absolute)
}
