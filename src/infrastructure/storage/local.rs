use async_trait::async_trait;
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::{fs, io::AsyncWriteExt};

use crate::{
    domain::path_rules::relative_request_path,
    entities::asset::AssetCategory,
    repositories::storage::AssetStorage,
    settings::AppConfig,
};

#[cfg_attr(not(unix), allow(dead_code))]
const DIR_MODE: u32 = 0o755;

/// Keeps assets on the local filesystem under one root per category.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    image_root: PathBuf,
    file_root: PathBuf,
}

impl LocalStorage {
    pub fn new(image_root: impl Into<PathBuf>, file_root: impl Into<PathBuf>) -> Self {
        LocalStorage {
            image_root: image_root.into(),
            file_root: file_root.into(),
        }
    }

    pub fn root(&self, category: AssetCategory) -> &Path {
        match category {
            AssetCategory::Image => &self.image_root,
            AssetCategory::File => &self.file_root,
        }
    }

    /// Creates both category roots. Called once before the server binds.
    pub async fn ensure_roots(&self) -> io::Result<()> {
        for category in [AssetCategory::Image, AssetCategory::File] {
            create_dir_all(self.root(category)).await?;
            tracing::debug!(root = %self.root(category).display(), "Storage root ready");
        }
        Ok(())
    }
}

impl From<&AppConfig> for LocalStorage {
    fn from(config: &AppConfig) -> Self {
        LocalStorage::new(config.image_root.clone(), config.file_root.clone())
    }
}

async fn create_dir_all(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);
    builder.create(path).await
}

#[async_trait]
impl AssetStorage for LocalStorage {
    fn resolve(&self, category: AssetCategory, subpath: &str, filename: &str) -> PathBuf {
        self.root(category)
            .join(subpath.trim_start_matches('/'))
            .join(filename.trim_start_matches('/'))
    }

    async fn ensure_dir(&self, category: AssetCategory, subpath: &str) -> io::Result<()> {
        create_dir_all(&self.root(category).join(subpath.trim_start_matches('/'))).await
    }

    async fn write(
        &self,
        category: AssetCategory,
        subpath: &str,
        filename: &str,
        contents: &[u8],
    ) -> io::Result<PathBuf> {
        let full_path = self.resolve(category, subpath, filename);

        let mut file = fs::File::create(&full_path).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;

        Ok(full_path)
    }

    async fn remove(&self, category: AssetCategory, subpath: &str, filename: &str) -> io::Result<()> {
        fs::remove_file(self.resolve(category, subpath, filename)).await
    }

    async fn find(&self, category: AssetCategory, request_path: &str) -> Option<PathBuf> {
        let candidate = self.root(category).join(relative_request_path(request_path)?);

        match fs::metadata(&candidate).await {
            Ok(meta) if meta.is_file() => Some(candidate),
            _ => None,
        }
    }

    async fn root_ready(&self, category: AssetCategory) -> bool {
        fs::metadata(self.root(category))
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }
}
