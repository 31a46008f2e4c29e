//! Backs `GET /read`.
//!
//! With no root configured any path on the host is served, matching the
//! service's historical behaviour. Configuring a root confines reads to
//! that directory; paths outside it answer not-found.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ApiError;

#[derive(Debug, Clone, Default)]
pub struct FileReader {
    root: Option<PathBuf>,
}

impl FileReader {
    /// A reader that serves any path.
    pub fn unconfined() -> Self {
        Self { root: None }
    }

    /// A reader confined to `root`.
    pub fn confined(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Full contents of `path` as text.
    pub async fn read(&self, path: &str) -> Result<String, ApiError> {
        let target = self.resolve(Path::new(path)).await?;
        tokio::fs::read_to_string(&target).await.map_err(|e| {
            debug!(path, error = %e, "read failed");
            ApiError::NotFound
        })
    }

    async fn resolve(&self, path: &Path) -> Result<PathBuf, ApiError> {
        let Some(root) = &self.root else {
            return Ok(path.to_path_buf());
        };

        let root = tokio::fs::canonicalize(root)
            .await
            .map_err(|_| ApiError::NotFound)?;
        let candidate = if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        };
        let canonical = tokio::fs::canonicalize(&candidate)
            .await
            .map_err(|_| ApiError::NotFound)?;

        if canonical.starts_with(&root) {
            Ok(canonical)
        } else {
            debug!(path = %path.display(), "path outside read root");
            Err(ApiError::NotFound)
        }
    }
}
