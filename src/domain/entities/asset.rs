use actix_web::web::Bytes;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The two kinds of managed assets. Each one owns a storage root.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    #[display("image")]
    Image,

    #[display("file")]
    File,
}

impl AssetCategory {
    /// Sub-path used when the client leaves `path` empty.
    pub fn default_subpath(self) -> &'static str {
        match self {
            AssetCategory::Image => "images",
            AssetCategory::File => "files",
        }
    }

    /// Name of the multipart field carrying the upload.
    pub fn field_name(self) -> &'static str {
        match self {
            AssetCategory::Image => "image",
            AssetCategory::File => "file",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub contents: Bytes,
}

#[derive(Debug, Default)]
pub struct UploadForm {
    pub path: String,
    pub file: Option<UploadedFile>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct DeleteForm {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub path: String,

    #[serde(default)]
    #[validate(length(min = 1))]
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredAsset {
    pub category: AssetCategory,
    pub subpath: String,
    pub filename: String,
    pub url: String,
}

/// JSON body shared by every asset endpoint, successful or not.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AssetResponse {
    pub success: bool,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

impl AssetResponse {
    pub fn uploaded(asset: StoredAsset) -> Self {
        AssetResponse {
            success: true,
            message: format!("{} has been uploaded successfully", asset.category),
            filename: Some(asset.filename),
            url: Some(asset.url),
            debug: None,
        }
    }

    pub fn deleted(category: AssetCategory) -> Self {
        AssetResponse {
            success: true,
            message: format!("{} has been deleted successfully", category),
            filename: None,
            url: None,
            debug: None,
        }
    }

    pub fn failure(message: impl Into<String>, debug: Option<String>) -> Self {
        AssetResponse {
            success: false,
            message: message.into(),
            filename: None,
            url: None,
            debug,
        }
    }
}
