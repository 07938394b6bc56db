//! Run report for a mirror crawl
//!
//! The traversal controller records every terminal per-URL outcome here as it happens;
//! the CLI prints the summary when the run ends.

use crate::state::UrlState;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// A resource written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedResource {
    pub url: Url,
    pub path: PathBuf,
}

/// A per-URL failure and its reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlFailure {
    pub url: Url,
    pub reason: String,
}

/// Outcome of one mirror run
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Resources fetched and stored
    pub saved: Vec<SavedResource>,

    /// Resources that could not be fetched
    pub fetch_failures: Vec<UrlFailure>,

    /// Resources fetched but not stored
    pub persist_failures: Vec<UrlFailure>,

    /// Discovered links skipped because their file already existed
    pub skipped_existing: u64,

    /// Discovered links outside the seed's origin
    pub filtered_offsite: u64,

    /// Discovered links with no writable local path
    pub unmappable: u64,

    /// Set when the run stopped at `max-pages` with work still queued
    pub truncated: bool,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl CrawlReport {
    pub fn record_saved(&mut self, url: Url, path: PathBuf) {
        self.saved.push(SavedResource { url, path });
    }

    pub fn record_fetch_failure(&mut self, url: Url, reason: impl Into<String>) {
        self.fetch_failures.push(UrlFailure {
            url,
            reason: reason.into(),
        });
    }

    pub fn record_persist_failure(&mut self, url: Url, reason: impl Into<String>) {
        self.persist_failures.push(UrlFailure {
            url,
            reason: reason.into(),
        });
    }

    /// Number of URLs that ended in `state`
    pub fn count(&self, state: UrlState) -> usize {
        match state {
            UrlState::Saved => self.saved.len(),
            UrlState::FailedFetch => self.fetch_failures.len(),
            UrlState::FailedPersist => self.persist_failures.len(),
        }
    }

    /// Number of URLs a fetch was attempted for
    pub fn fetch_attempts(&self) -> usize {
        UrlState::ALL.iter().map(|s| self.count(*s)).sum()
    }

    /// Returns true if no URL failed
    pub fn is_clean(&self) -> bool {
        self.fetch_failures.is_empty() && self.persist_failures.is_empty()
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Mirror Summary ===\n");

    println!("Overview:");
    println!("  Fetch attempts: {}", report.fetch_attempts());
    println!("  Elapsed: {:.1?}", report.elapsed);
    println!();

    println!("URLs by State:");
    let total = report.fetch_attempts();
    for state in UrlState::ALL {
        let count = report.count(state);
        let percentage = if total > 0 {
            (count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    println!();

    println!("Links Not Followed:");
    println!("  Off-site: {}", report.filtered_offsite);
    println!("  Already on disk: {}", report.skipped_existing);
    println!("  Unmappable path: {}", report.unmappable);
    println!();

    if !report.fetch_failures.is_empty() {
        println!("Fetch Failures ({}):", report.fetch_failures.len());
        for failure in &report.fetch_failures {
            println!("  - {}: {}", failure.url, failure.reason);
        }
        println!();
    }

    if !report.persist_failures.is_empty() {
        println!("Persist Failures ({}):", report.persist_failures.len());
        for failure in &report.persist_failures {
            println!("  - {}: {}", failure.url, failure.reason);
        }
        println!();
    }

    if report.truncated {
        println!("Stopped at the max-pages limit with links still queued.");
    }
}
