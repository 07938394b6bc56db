//! Storage traits and error types
//!
//! This module defines the trait interface the crawler uses to persist fetched bytes,
//! and the errors a backend may report.

use crate::UrlError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while persisting a resource
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No writable path: {0}")]
    Path(#[from] UrlError),
}

/// Result type for storage operations
pub type PersistResult<T> = Result<T, PersistError>;

/// Trait for storage backend implementations
///
/// Paths passed in are relative to the backend's root. Implementations must create
/// missing intermediate directories before writing.
#[async_trait]
pub trait Persister: Send + Sync {
    /// Writes `bytes` at `path`, returning the location actually written
    async fn save(&self, path: &Path, bytes: &[u8]) -> PersistResult<PathBuf>;

    /// Returns true if something is already stored at `path`
    async fn exists(&self, path: &Path) -> bool;
}
