//! Storage module for persisting mirrored resources
//!
//! The crawler only sees the [`Persister`] trait; [`FsPersister`] writes the bytes under
//! the output directory, mirroring each URL's path.

mod fs;
mod traits;

pub use fs::FsPersister;
pub use traits::{PersistError, PersistResult, Persister};
