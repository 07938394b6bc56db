use crate::storage::traits::{PersistError, PersistResult, Persister};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Filesystem storage rooted at the mirror's output directory
#[derive(Debug, Clone)]
pub struct FsPersister {
    root: PathBuf,
}

impl FsPersister {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl Persister for FsPersister {
    async fn save(&self, path: &Path, bytes: &[u8]) -> PersistResult<PathBuf> {
        let target = self.root.join(path);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| PersistError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&target, bytes)
            .await
            .map_err(|source| PersistError::Write {
                path: target.clone(),
                source,
            })?;

        tracing::trace!("Wrote {} bytes to {}", bytes.len(), target.display());
        Ok(target)
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(self.root.join(path))
            .await
            .unwrap_or(false)
    }
}
