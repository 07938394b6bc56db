//! Crawler module for fetching and mirroring a site
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with optional retry
//! - HTML link extraction
//! - The explicit work queue
//! - Overall traversal control

mod controller;
mod extractor;
mod fetcher;
mod frontier;

pub use controller::TraversalController;
pub use extractor::{extract_links, extract_tagged_links, ExtractedLink, LinkKind};
pub use fetcher::{build_http_client, is_html, FetchError, FetchedResource, Fetcher, HttpFetcher};
pub use frontier::{Frontier, QueuedUrl};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::storage::FsPersister;
use crate::MirrorError;
use url::Url;

/// Runs a complete mirror operation
///
/// This is the main entry point for a run. It will:
/// 1. Parse the seed URL
/// 2. Build the HTTP client
/// 3. Root the filesystem persister at the output directory
/// 4. Drain the frontier until no new same-origin resources remain
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The run finished; per-URL failures are in the report
/// * `Err(MirrorError)` - The run could not start
///
/// # Example
///
/// ```no_run
/// use site_mirror::config::load_config;
/// use site_mirror::crawler::mirror;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("mirror.toml"))?;
/// let report = mirror(config).await?;
/// println!("{} resources saved", report.saved.len());
/// # Ok(())
/// # }
/// ```
pub async fn mirror(config: Config) -> Result<CrawlReport, MirrorError> {
    let seed = Url::parse(&config.mirror.seed_url)?;
    let fetcher = HttpFetcher::from_config(&config.fetch)?;
    let persister = FsPersister::new(&config.mirror.output_dir);

    tracing::info!(
        "Mirroring {} into {}",
        seed,
        persister.root().display()
    );

    let controller = TraversalController::new(seed, config.crawl, fetcher, persister)?;
    Ok(controller.run().await)
}
