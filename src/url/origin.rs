use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// The scope key that restricts a crawl to one site
///
/// Two URLs share an origin when their host and explicit port match. The scheme and any
/// userinfo are ignored, so `http://site.test/a` and `https://site.test/b` are in scope of
/// each other. Default ports are already elided by the `url` crate, which makes
/// `https://site.test:443/` and `https://site.test/` equal as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    host: String,
    port: Option<u16>,
}

impl Origin {
    /// Extracts the origin of a URL
    ///
    /// # Errors
    ///
    /// Returns `UrlError::MissingHost` for URLs without a host (`mailto:`, `data:`).
    pub fn of(url: &Url) -> UrlResult<Self> {
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| UrlError::MissingHost(url.to_string()))?;

        Ok(Self {
            host: host.to_lowercase(),
            port: url.port(),
        })
    }

    /// Returns true if `url` belongs to this origin
    pub fn contains(&self, url: &Url) -> bool {
        Origin::of(url).map_or(false, |other| &other == self)
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => write!(f, "{}", self.host),
        }
    }
}
