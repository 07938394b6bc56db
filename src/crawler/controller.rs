//! Traversal controller - main mirror orchestration logic
//!
//! This module contains the crawl loop that ties the collaborators together:
//! - Draining the frontier in depth-first or breadth-first order
//! - Deduplicating through the visited registry
//! - Fetching, persisting and link-extracting each resource
//! - Filtering discovered links by origin, visited state and on-disk presence

use crate::config::{CollisionPolicy, CrawlConfig};
use crate::crawler::extractor::extract_links;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{Frontier, QueuedUrl};
use crate::output::CrawlReport;
use crate::state::{UrlState, VisitedRegistry};
use crate::storage::{PersistError, Persister};
use crate::url::{LocalPathMapper, Origin};
use crate::{MirrorError, UrlError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use url::Url;

/// Drives one mirror run from a seed URL until no new resources remain
///
/// The controller owns all run state (registry, frontier, report), so independent
/// controllers never share anything.
pub struct TraversalController<F, P> {
    fetcher: F,
    persister: P,
    mapper: LocalPathMapper,
    registry: VisitedRegistry,
    frontier: Frontier,
    scope: Origin,
    options: CrawlConfig,
    /// Local paths written in this run; only consulted under `CollisionPolicy::Error`
    claimed: HashMap<PathBuf, Url>,
    report: CrawlReport,
}

impl<F: Fetcher, P: Persister> TraversalController<F, P> {
    /// Creates a controller with the seed queued
    ///
    /// # Errors
    ///
    /// * `MirrorError::Seed` - the seed is not an http(s) URL with a host
    pub fn new(
        seed: Url,
        options: CrawlConfig,
        fetcher: F,
        persister: P,
    ) -> Result<Self, MirrorError> {
        if seed.scheme() != "http" && seed.scheme() != "https" {
            return Err(UrlError::UnsupportedScheme(seed.scheme().to_string()).into());
        }
        let scope = Origin::of(&seed)?;

        let mut frontier = Frontier::new(options.order);
        frontier.push(QueuedUrl {
            url: seed,
            depth: 0,
        });

        Ok(Self {
            fetcher,
            persister,
            mapper: LocalPathMapper::from_config(&options),
            registry: VisitedRegistry::new(),
            frontier,
            scope,
            options,
            claimed: HashMap::new(),
            report: CrawlReport::default(),
        })
    }

    /// Runs the crawl loop until the frontier is exhausted
    ///
    /// Per-URL failures never abort the run; they are logged and land in the report.
    pub async fn run(mut self) -> CrawlReport {
        tracing::info!("Starting mirror of {}", self.scope);

        let start_time = Instant::now();
        let mut attempts: u64 = 0;

        while let Some(queued) = self.frontier.pop() {
            // Unseen -> Visiting: mark before any outbound link is followed
            if !self.registry.check_and_mark(&queued.url) {
                tracing::trace!("Already visited: {}", queued.url);
                continue;
            }

            if let Some(max_pages) = self.options.max_pages {
                if attempts >= max_pages {
                    tracing::warn!(
                        "Reached max-pages limit of {}, {} URLs left in frontier",
                        max_pages,
                        self.frontier.len() + 1
                    );
                    self.report.truncated = true;
                    break;
                }
            }

            let state = self.process_url(&queued).await;
            tracing::trace!("{} -> {}", queued.url, state);

            attempts += 1;
            if attempts % 10 == 0 {
                let elapsed = start_time.elapsed();
                tracing::info!(
                    "Progress: {} URLs processed, {} in frontier, {:.2} URLs/sec",
                    attempts,
                    self.frontier.len(),
                    attempts as f64 / elapsed.as_secs_f64()
                );
            }
        }

        self.report.elapsed = start_time.elapsed();
        tracing::info!(
            "Mirror completed: {} saved, {} fetch failures, {} persist failures in {:?}",
            self.report.saved.len(),
            self.report.fetch_failures.len(),
            self.report.persist_failures.len(),
            self.report.elapsed
        );

        self.report
    }

    /// Processes a single URL and returns its terminal state
    ///
    /// 1. Fetches the resource
    /// 2. Persists the bytes at the path mapped from the post-redirect URL
    /// 3. If the body is HTML, extracts and queues its links (even when persisting failed)
    ///
    /// Links resolve against the post-redirect URL, so the page is stored there too; a
    /// `/docs` -> `/docs/` redirect lands in `docs/index.html` next to its children.
    async fn process_url(&mut self, queued: &QueuedUrl) -> UrlState {
        let url = &queued.url;
        tracing::debug!("Processing URL (depth {}): {}", queued.depth, url);

        let resource = match self.fetcher.fetch(url).await {
            Ok(resource) => resource,
            Err(e) => {
                tracing::warn!("Failed to download {}: {}", url, e);
                self.report.record_fetch_failure(url.clone(), e.to_string());
                return UrlState::FailedFetch;
            }
        };

        let stored_as = self.redirect_target(url, &resource.final_url);

        let state = match self.persist(stored_as, &resource.bytes).await {
            Ok(path) => {
                tracing::info!("Saved {} as {}", url, path.display());
                self.report.record_saved(url.clone(), path);
                UrlState::Saved
            }
            Err(e) => {
                tracing::warn!("Failed to save {}: {}", url, e);
                self.report.record_persist_failure(url.clone(), e.to_string());
                UrlState::FailedPersist
            }
        };

        if state.follows_links() {
            if let Some(text) = resource.text.as_deref() {
                self.enqueue_links(text, &resource.final_url, queued.depth).await;
            }
        }

        state
    }

    /// Picks the URL a fetched resource is stored under and marks a redirect target visited
    ///
    /// Off-site redirect targets are not ours to mirror, so those keep the requested URL.
    fn redirect_target<'a>(&mut self, requested: &'a Url, final_url: &'a Url) -> &'a Url {
        if VisitedRegistry::key(final_url) == VisitedRegistry::key(requested)
            || !self.scope.contains(final_url)
        {
            return requested;
        }

        tracing::debug!("{} redirected to {}", requested, final_url);
        self.registry.mark_visited(final_url);
        final_url
    }

    async fn persist(&mut self, url: &Url, bytes: &[u8]) -> Result<PathBuf, PersistError> {
        let path = self.mapper.local_path(url)?;
        self.check_claim(url, &path)?;
        let saved = self.persister.save(&path, bytes).await?;
        if self.mapper.collision_policy() == CollisionPolicy::Error {
            self.claimed.insert(path, url.clone());
        }
        Ok(saved)
    }

    /// Rejects `url` under the error policy when another URL already wrote `path`
    fn check_claim(&self, url: &Url, path: &Path) -> Result<(), UrlError> {
        if self.mapper.collision_policy() != CollisionPolicy::Error {
            return Ok(());
        }

        match self.claimed.get(path) {
            Some(existing) if existing != url => Err(UrlError::PathCollision {
                path: path.display().to_string(),
                existing: existing.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Extracts links from a page and queues the ones worth fetching
    ///
    /// A link survives when it is not yet visited, shares the seed's origin, maps to a
    /// writable path, and (with `skip-existing`) has no file at that path yet.
    async fn enqueue_links(&mut self, html: &str, base_url: &Url, depth: u32) {
        let links = extract_links(html, base_url);
        tracing::debug!("Found {} links on {}", links.len(), base_url);

        let mut children = Vec::new();
        for link in links {
            if self.registry.is_visited(&link) {
                continue;
            }

            if !self.scope.contains(&link) {
                tracing::debug!("Skipping off-site link {}", link);
                self.report.filtered_offsite += 1;
                continue;
            }

            let path = match self.mapper.local_path(&link) {
                Ok(path) => path,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", link, e);
                    self.report.unmappable += 1;
                    continue;
                }
            };

            if self.options.skip_existing && self.persister.exists(&path).await {
                tracing::debug!("Skipping {}: {} already exists", link, path.display());
                self.report.skipped_existing += 1;
                continue;
            }

            children.push(QueuedUrl {
                url: link,
                depth: depth + 1,
            });
        }

        self.frontier.push_children(children);
    }
}
