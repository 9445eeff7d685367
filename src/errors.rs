use actix_multipart::MultipartError;
use actix_web::{
    error::{PayloadError, ResponseError},
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use derive_more::Display;

use crate::entities::asset::{AssetCategory, AssetResponse};

#[derive(Debug, Display)]
pub enum AssetError {
    #[display("invalid request")]
    InvalidRequest,

    #[display("{_0} is required")]
    MissingUpload(AssetCategory),

    #[display("only images are allowed")]
    ImagesOnly,

    #[display("invalid path")]
    InvalidPath,

    #[display("path and filename are required")]
    MissingDeleteTarget,

    #[display("request body too large")]
    PayloadTooLarge,

    #[display("invalid idempotency key")]
    InvalidIdempotencyKey,

    #[display("{message}")]
    Storage {
        message: String,
        debug: Option<String>,
    },
}

impl AssetError {
    /// Storage failure. The raw error text is kept only when `expose` is set.
    pub fn storage(message: impl Into<String>, err: &std::io::Error, expose: bool) -> Self {
        let message = message.into();
        tracing::error!(error = %err, "{}", message);

        AssetError::Storage {
            message,
            debug: expose.then(|| err.to_string()),
        }
    }
}

impl ResponseError for AssetError {
    fn error_response(&self) -> HttpResponse {
        let debug = match self {
            AssetError::Storage { debug, .. } => debug.clone(),
            _ => None,
        };

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(AssetResponse::failure(self.to_string(), debug))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AssetError::InvalidRequest
            | AssetError::MissingUpload(_)
            | AssetError::ImagesOnly
            | AssetError::InvalidPath
            | AssetError::MissingDeleteTarget
            | AssetError::InvalidIdempotencyKey => StatusCode::BAD_REQUEST,
            AssetError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AssetError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for AssetError {
    fn from(err: MultipartError) -> Self {
        match err {
            MultipartError::Payload(PayloadError::Overflow) => AssetError::PayloadTooLarge,
            _ => {
                tracing::debug!("Rejected multipart body: {}", err);
                AssetError::InvalidRequest
            }
        }
    }
}

impl From<validator::ValidationErrors> for AssetError {
    fn from(_: validator::ValidationErrors) -> Self {
        AssetError::MissingDeleteTarget
    }
}
