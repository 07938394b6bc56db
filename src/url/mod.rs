//! URL handling module for Site-Mirror
//!
//! This module provides URL-to-path mapping and the origin key used to keep a crawl
//! on one site.

mod origin;
mod path_map;

// Re-export main types
pub use origin::Origin;
pub use path_map::{url_to_path, LocalPathMapper};
