use async_trait::async_trait;
use std::{io, path::PathBuf};

use crate::entities::asset::AssetCategory;

/// Maps `(category, sub-path, filename)` triples onto persistent storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetStorage: Send + Sync {
    /// Location of an asset, joined with the platform's path rules.
    fn resolve(&self, category: AssetCategory, subpath: &str, filename: &str) -> PathBuf;

    /// Creates the sub-path directory tree if missing. Idempotent.
    async fn ensure_dir(&self, category: AssetCategory, subpath: &str) -> io::Result<()>;

    /// Creates or truncates the asset with `contents`.
    async fn write(
        &self,
        category: AssetCategory,
        subpath: &str,
        filename: &str,
        contents: &[u8],
    ) -> io::Result<PathBuf>;

    /// Removes exactly one asset. A missing file is an error.
    async fn remove(&self, category: AssetCategory, subpath: &str, filename: &str) -> io::Result<()>;

    /// Regular file under the category root addressed by a URL path, if any.
    async fn find(&self, category: AssetCategory, request_path: &str) -> Option<PathBuf>;

    /// Whether the category root is present as a directory.
    async fn root_ready(&self, category: AssetCategory) -> bool;
}
