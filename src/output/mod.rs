//! Output module for reporting mirror runs

mod report;

pub use report::{print_report, CrawlReport, SavedResource, UrlFailure};
