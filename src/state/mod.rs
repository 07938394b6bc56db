//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `UrlState`: terminal per-URL outcomes (saved, failed fetch, failed persist)
//! - `VisitedRegistry`: the dedup ledger that guarantees termination on cyclic sites

mod url_state;
mod visited;

// Re-export main types
pub use url_state::UrlState;
pub use visited::VisitedRegistry;
