use std::path::PathBuf;

use crate::entities::asset::AssetCategory;
use crate::repositories::storage::AssetStorage;

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedAsset {
    Image(PathBuf),
    File(PathBuf),
    Placeholder(PathBuf),
}

impl ResolvedAsset {
    pub fn path(&self) -> &PathBuf {
        match self {
            ResolvedAsset::Image(path) | ResolvedAsset::File(path) | ResolvedAsset::Placeholder(path) => path,
        }
    }
}

/// Looks a URL path up in the image root, then the file root, and falls
/// back to the placeholder. The placeholder is returned even if it is missing.
pub struct Resolver<S: AssetStorage> {
    storage: S,
    placeholder: PathBuf,
}

impl<S: AssetStorage> Resolver<S> {
    pub fn new(storage: S, placeholder: impl Into<PathBuf>) -> Self {
        Resolver {
            storage,
            placeholder: placeholder.into(),
        }
    }

    pub async fn resolve(&self, request_path: &str) -> ResolvedAsset {
        if let Some(path) = self.storage.find(AssetCategory::Image, request_path).await {
            return ResolvedAsset::Image(path);
        }

        if let Some(path) = self.storage.find(AssetCategory::File, request_path).await {
            return ResolvedAsset::File(path);
        }

        tracing::debug!(path = request_path, "No asset found, serving placeholder");
        ResolvedAsset::Placeholder(self.placeholder.clone())
    }

    pub async fn storage_ready(&self) -> bool {
        self.storage.root_ready(AssetCategory::Image).await
            && self.storage.root_ready(AssetCategory::File).await
    }
}
