/// Per-URL outcome definitions for tracking crawl progress
///
/// A URL is `Unseen` until the visited registry holds it and `Visiting` while the
/// controller works on it; both are implied by the registry. This module defines the
/// outcomes a visited URL ends in.
use std::fmt;

/// Terminal outcome of a URL the controller selected for processing
///
/// Transitions: `Unseen -> Visiting -> {Saved, FailedFetch, FailedPersist}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlState {
    // ===== Success =====
    /// Resource was fetched and written to disk
    Saved,

    // ===== Errors =====
    /// Transport failure or non-success status
    FailedFetch,

    /// Resource was fetched but could not be written
    FailedPersist,
}

impl UrlState {
    /// All outcomes, in reporting order
    pub const ALL: [UrlState; 3] = [Self::Saved, Self::FailedFetch, Self::FailedPersist];

    /// Returns true if links of a page in this state are followed
    ///
    /// A storage failure does not block link discovery; only a failed fetch does.
    pub fn follows_links(&self) -> bool {
        matches!(self, Self::Saved | Self::FailedPersist)
    }

    /// Short label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::FailedFetch => "failed_fetch",
            Self::FailedPersist => "failed_persist",
        }
    }
}

impl fmt::Display for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
