use crate::config::{CollisionPolicy, CrawlConfig};
use crate::{UrlError, UrlResult};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use url::Url;

/// Number of hex characters of the query hash used as a file name suffix
const QUERY_SUFFIX_LEN: usize = 8;

/// Converts a URL into its raw local path
///
/// Scheme, host, query and fragment are dropped; the path component is kept verbatim
/// (percent-escapes included) with its leading slashes removed. The result is empty for
/// a URL whose path is `/`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mirror::url::url_to_path;
///
/// let url = Url::parse("https://site.test/html/help/news.html?lang=en#top").unwrap();
/// assert_eq!(url_to_path(&url), "html/help/news.html");
///
/// let url = Url::parse("https://site.test").unwrap();
/// assert_eq!(url_to_path(&url), "");
/// ```
pub fn url_to_path(url: &Url) -> String {
    url.path().trim_start_matches('/').to_string()
}

/// Maps URLs to writable paths relative to the output root
///
/// On top of [`url_to_path`] this:
/// - appends the index file name to empty and directory-style paths
/// - rejects segments that could leave the output root
/// - applies the configured [`CollisionPolicy`] for URLs with a query string
#[derive(Debug, Clone)]
pub struct LocalPathMapper {
    index_file: String,
    collision: CollisionPolicy,
}

impl LocalPathMapper {
    pub fn new(index_file: impl Into<String>, collision: CollisionPolicy) -> Self {
        Self {
            index_file: index_file.into(),
            collision,
        }
    }

    pub fn from_config(config: &CrawlConfig) -> Self {
        Self::new(config.index_file.clone(), config.collision)
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision
    }

    /// Returns the relative local path for a URL
    ///
    /// # Errors
    ///
    /// * `UrlError::UnsupportedScheme` - the URL is not http(s)
    /// * `UrlError::PathTraversal` - a path segment would escape the output root
    pub fn local_path(&self, url: &Url) -> UrlResult<PathBuf> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
        }

        let mut relative = url_to_path(url);
        if relative.is_empty() || relative.ends_with('/') {
            relative.push_str(&self.index_file);
        }

        let path = sanitize_relative(&relative)?;

        match (self.collision, url.query().filter(|q| !q.is_empty())) {
            (CollisionPolicy::QuerySuffix, Some(query)) => Ok(with_query_suffix(&path, query)),
            _ => Ok(path),
        }
    }
}

impl Default for LocalPathMapper {
    fn default() -> Self {
        Self::from_config(&CrawlConfig::default())
    }
}

/// Builds a relative path from `/`-separated segments, refusing anything that is not a
/// plain name. Empty segments (from `a//b`) are collapsed.
fn sanitize_relative(relative: &str) -> UrlResult<PathBuf> {
    let mut path = PathBuf::new();

    for segment in relative.split('/') {
        if segment.is_empty() {
            continue;
        }
        if segment == "." || segment == ".." || segment.contains(['\\', '\0']) {
            return Err(UrlError::PathTraversal(relative.to_string()));
        }
        path.push(segment);
    }

    if path.as_os_str().is_empty() {
        return Err(UrlError::PathTraversal(relative.to_string()));
    }

    Ok(path)
}

/// `news.html` + `lang=en` becomes `news.<hash>.html`
fn with_query_suffix(path: &Path, query: &str) -> PathBuf {
    let digest = hex::encode(Sha256::digest(query.as_bytes()));
    let suffix = &digest[..QUERY_SUFFIX_LEN];

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{}.{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}.{}", stem, suffix),
    };

    path.with_file_name(file_name)
}
