use validator::Validate;

use crate::domain::path_rules::{is_allowed_image, is_single_component, is_valid_subpath};
use crate::entities::asset::{AssetCategory, DeleteForm, StoredAsset, UploadForm};
use crate::errors::AssetError;
use crate::naming::signer::{FilenameSigner, RandomSource};
use crate::repositories::storage::AssetStorage;
use crate::settings::AppConfig;
use crate::use_cases::extractors::RequestOrigin;

/// Behaviour switches taken from [`AppConfig`].
#[derive(Debug, Clone, Copy)]
pub struct AssetPolicy {
    pub expose_error_details: bool,
    pub derive_url_scheme: bool,
    pub strict_delete_paths: bool,
}

impl From<&AppConfig> for AssetPolicy {
    fn from(config: &AppConfig) -> Self {
        AssetPolicy {
            expose_error_details: config.expose_error_details,
            derive_url_scheme: config.derive_url_scheme,
            strict_delete_paths: config.strict_delete_paths,
        }
    }
}

pub struct AssetHandler<S, R>
where
    S: AssetStorage,
    R: RandomSource,
{
    pub storage: S,
    pub signer: FilenameSigner<R>,
    pub policy: AssetPolicy,
}

impl<S, R> AssetHandler<S, R>
where
    S: AssetStorage,
    R: RandomSource,
{
    pub fn new(storage: S, signer: FilenameSigner<R>, policy: AssetPolicy) -> Self {
        AssetHandler {
            storage,
            signer,
            policy,
        }
    }

    /// Validates an upload form and persists the file under a signed name.
    pub async fn upload(
        &self,
        category: AssetCategory,
        form: UploadForm,
        origin: &RequestOrigin,
    ) -> Result<StoredAsset, AssetError> {
        let file = form.file.ok_or(AssetError::MissingUpload(category))?;

        if category == AssetCategory::Image && !is_allowed_image(&file.file_name) {
            return Err(AssetError::ImagesOnly);
        }

        let default_subpath = category.default_subpath();
        let subpath = if form.path.is_empty() {
            default_subpath.to_string()
        } else {
            form.path
        };

        if subpath != default_subpath && !is_valid_subpath(&subpath) {
            return Err(AssetError::InvalidPath);
        }

        let failure = format!("unable to upload {}", category);

        self.storage
            .ensure_dir(category, &subpath)
            .await
            .map_err(|e| AssetError::storage(&failure, &e, self.policy.expose_error_details))?;

        let filename = self.signer.sign(&file.file_name);

        let written = self.storage
            .write(category, &subpath, &filename, &file.contents)
            .await
            .map_err(|e| AssetError::storage(&failure, &e, self.policy.expose_error_details))?;

        tracing::info!(
            %category,
            path = %written.display(),
            bytes = file.contents.len(),
            "Stored asset"
        );

        let url = origin.asset_url(self.policy.derive_url_scheme, &subpath, &filename);

        Ok(StoredAsset {
            category,
            subpath,
            filename,
            url,
        })
    }

    /// Removes a single asset addressed by its sub-path and stored name.
    pub async fn delete(&self, category: AssetCategory, form: DeleteForm) -> Result<(), AssetError> {
        form.validate()?;

        if self.policy.strict_delete_paths
            && !(is_valid_subpath(&form.path) && is_single_component(&form.filename))
        {
            return Err(AssetError::InvalidPath);
        }

        self.storage
            .remove(category, &form.path, &form.filename)
            .await
            .map_err(|e| {
                AssetError::storage(
                    format!("unable to delete {}", category),
                    &e,
                    self.policy.expose_error_details,
                )
            })?;

        tracing::info!(%category, path = %form.path, filename = %form.filename, "Deleted asset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::asset::UploadedFile;
    use crate::naming::signer::tests::FixedSource;
    use crate::repositories::storage::MockAssetStorage;
    use actix_web::web::Bytes;
    use mockall::predicate::eq;
    use std::{io, path::PathBuf};

    fn policy() -> AssetPolicy {
        AssetPolicy {
            expose_error_details: true,
            derive_url_scheme: false,
            strict_delete_paths: true,
        }
    }

    fn handler(storage: MockAssetStorage, policy: AssetPolicy) -> AssetHandler<MockAssetStorage, FixedSource> {
        AssetHandler::new(storage, FilenameSigner::new(FixedSource("Zq7Lm2P")), policy)
    }

    fn origin() -> RequestOrigin {
        RequestOrigin {
            scheme: "https".to_string(),
            host: "cdn.example.com:3000".to_string(),
        }
    }

    fn form(path: &str, file_name: Option<&str>) -> UploadForm {
        UploadForm {
            path: path.to_string(),
            file: file_name.map(|name| UploadedFile {
                file_name: name.to_string(),
                contents: Bytes::from_static(b"payload"),
            }),
        }
    }

    #[tokio::test]
    async fn upload_defaults_subpath_and_builds_http_url() {
        let mut storage = MockAssetStorage::new();
        storage
            .expect_ensure_dir()
            .with(eq(AssetCategory::Image), eq("images"))
            .times(1)
            .returning(|_, _| Ok(()));
        storage
            .expect_write()
            .withf(|category, subpath, name, contents| {
                *category == AssetCategory::Image
                    && subpath == "images"
                    && name.starts_with("cdn-")
                    && name.ends_with("Zq7Lm2P-cat.png")
                    && contents == b"payload"
            })
            .times(1)
            .returning(|_, subpath, name, _| Ok(PathBuf::from(subpath).join(name)));

        let stored = handler(storage, policy())
            .upload(AssetCategory::Image, form("", Some("cat.png")), &origin())
            .await
            .unwrap();

        assert_eq!(stored.subpath, "images");
        assert_eq!(
            stored.url,
            format!("http://cdn.example.com:3000/images/{}", stored.filename)
        );
    }

    #[tokio::test]
    async fn upload_uses_request_scheme_when_configured() {
        let mut storage = MockAssetStorage::new();
        storage.expect_ensure_dir().returning(|_, _| Ok(()));
        storage.expect_write().returning(|_, _, _, _| Ok(PathBuf::new()));

        let stored = handler(storage, AssetPolicy { derive_url_scheme: true, ..policy() })
            .upload(AssetCategory::File, form("docs/2024", Some("a.pdf")), &origin())
            .await
            .unwrap();

        assert!(stored.url.starts_with("https://cdn.example.com:3000/docs/2024/cdn-"));
    }

    #[tokio::test]
    async fn upload_requires_the_file_part() {
        let err = handler(MockAssetStorage::new(), policy())
            .upload(AssetCategory::File, form("", None), &origin())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "file is required");
    }

    #[tokio::test]
    async fn image_upload_checks_extension_before_path() {
        let err = handler(MockAssetStorage::new(), policy())
            .upload(AssetCategory::Image, form("bad.path", Some("notes.txt")), &origin())
            .await
            .unwrap_err();

        assert!(matches!(err, AssetError::ImagesOnly));
    }

    #[tokio::test]
    async fn file_upload_accepts_any_extension() {
        let mut storage = MockAssetStorage::new();
        storage.expect_ensure_dir().returning(|_, _| Ok(()));
        storage.expect_write().returning(|_, _, _, _| Ok(PathBuf::new()));

        let stored = handler(storage, policy())
            .upload(AssetCategory::File, form("", Some("notes.txt")), &origin())
            .await
            .unwrap();

        assert!(stored.filename.ends_with("-notes.txt"));
    }

    #[tokio::test]
    async fn upload_rejects_traversal_subpath() {
        let err = handler(MockAssetStorage::new(), policy())
            .upload(AssetCategory::File, form("../etc", Some("x.txt")), &origin())
            .await
            .unwrap_err();

        assert!(matches!(err, AssetError::InvalidPath));
    }

    #[tokio::test]
    async fn ensure_dir_failure_is_a_storage_error() {
        let mut storage = MockAssetStorage::new();
        storage
            .expect_ensure_dir()
            .returning(|_, _| Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")));

        let err = handler(storage, policy())
            .upload(AssetCategory::Image, form("custom", Some("cat.jpg")), &origin())
            .await
            .unwrap_err();

        match err {
            AssetError::Storage { message, debug } => {
                assert_eq!(message, "unable to upload image");
                assert_eq!(debug.as_deref(), Some("denied"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn write_failure_hides_debug_when_not_exposed() {
        let mut storage = MockAssetStorage::new();
        storage.expect_ensure_dir().returning(|_, _| Ok(()));
        storage
            .expect_write()
            .returning(|_, _, _, _| Err(io::Error::other("disk full")));

        let err = handler(storage, AssetPolicy { expose_error_details: false, ..policy() })
            .upload(AssetCategory::File, form("", Some("a.bin")), &origin())
            .await
            .unwrap_err();

        assert!(matches!(err, AssetError::Storage { debug: None, .. }));
    }

    #[tokio::test]
    async fn delete_requires_both_fields() {
        let err = handler(MockAssetStorage::new(), policy())
            .delete(
                AssetCategory::Image,
                DeleteForm { path: "images".into(), filename: String::new() },
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "path and filename are required");
    }

    #[tokio::test]
    async fn strict_delete_rejects_escaping_paths() {
        let h = handler(MockAssetStorage::new(), policy());

        for (path, filename) in [("../..", "passwd"), ("images", "../secret"), ("a.b", "x.png")] {
            let err = h
                .delete(AssetCategory::File, DeleteForm { path: path.into(), filename: filename.into() })
                .await
                .unwrap_err();
            assert!(matches!(err, AssetError::InvalidPath), "{path}/{filename}");
        }
    }

    #[tokio::test]
    async fn relaxed_delete_passes_paths_through() {
        let mut storage = MockAssetStorage::new();
        storage
            .expect_remove()
            .with(eq(AssetCategory::File), eq("../elsewhere"), eq("x.txt"))
            .times(1)
            .returning(|_, _, _| Ok(()));

        handler(storage, AssetPolicy { strict_delete_paths: false, ..policy() })
            .delete(
                AssetCategory::File,
                DeleteForm { path: "../elsewhere".into(), filename: "x.txt".into() },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_of_missing_file_is_a_storage_error() {
        let mut storage = MockAssetStorage::new();
        storage
            .expect_remove()
            .returning(|_, _, _| Err(io::Error::new(io::ErrorKind::NotFound, "no such file")));

        let err = handler(storage, policy())
            .delete(
                AssetCategory::Image,
                DeleteForm { path: "custom".into(), filename: "cdn-1abc-cat.png".into() },
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "unable to delete image");
    }
}
