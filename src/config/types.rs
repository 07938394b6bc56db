use serde::Deserialize;

/// Main configuration structure for Site-Mirror
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mirror: MirrorConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
}

impl Config {
    /// Builds a configuration with default fetch and crawl settings
    pub fn from_seed(seed_url: impl Into<String>, output_dir: impl Into<String>) -> Self {
        Self {
            mirror: MirrorConfig {
                seed_url: seed_url.into(),
                output_dir: output_dir.into(),
            },
            fetch: FetchConfig::default(),
            crawl: CrawlConfig::default(),
        }
    }
}

/// What to mirror and where to put it
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    /// Absolute URL the crawl starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Root directory that mirrored paths are written under
    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: String,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request deadline (milliseconds)
    #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Connection establishment deadline (milliseconds)
    #[serde(rename = "connect-timeout-ms", default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Maximum number of redirects followed per request
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Extra attempts for timeouts, connection errors and 5xx responses
    #[serde(rename = "max-retries", default)]
    pub max_retries: u32,

    /// Base delay between retries; attempt `n` waits `n * retry_backoff_ms`
    #[serde(rename = "retry-backoff-ms", default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            max_redirects: default_max_redirects(),
            max_retries: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Traversal policy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Order in which discovered links are explored
    #[serde(default)]
    pub order: TraversalOrder,

    /// Skip discovered links whose mapped file already exists on disk
    #[serde(rename = "skip-existing", default = "default_true")]
    pub skip_existing: bool,

    /// File name used for URLs whose path is empty or ends in `/`
    #[serde(rename = "index-file", default = "default_index_file")]
    pub index_file: String,

    /// What to do when two URLs map to the same local path
    #[serde(default)]
    pub collision: CollisionPolicy,

    /// Upper bound on fetch attempts for the whole run
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u64>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            order: TraversalOrder::default(),
            skip_existing: true,
            index_file: default_index_file(),
            collision: CollisionPolicy::default(),
            max_pages: None,
        }
    }
}

/// Work queue discipline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalOrder {
    /// Each link and its descendants are explored before its next sibling
    #[default]
    DepthFirst,
    /// Links are explored in discovery order, level by level
    BreadthFirst,
}

/// Policy for distinct URLs that share a local path (e.g. differing only by query)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Last write wins
    #[default]
    Overwrite,
    /// Insert a short hash of the query string before the file extension
    QuerySuffix,
    /// Refuse to store a second URL at an already-claimed path
    Error,
}

fn default_output_dir() -> String {
    "mirror".to_string()
}

fn default_user_agent() -> String {
    format!("site-mirror/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_max_redirects() -> usize {
    10
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_index_file() -> String {
    "index.html".to_string()
}

fn default_true() -> bool {
    true
}
