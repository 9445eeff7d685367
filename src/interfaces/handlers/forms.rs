use actix_multipart::{Field, Multipart};
use actix_web::{
    web::{self, BytesMut},
    FromRequest, HttpMessage, HttpRequest,
};
use futures_util::TryStreamExt;

use crate::constants::MAX_TEXT_FIELD_BYTES;
use crate::domain::path_rules::client_file_name;
use crate::entities::asset::{AssetCategory, DeleteForm, UploadForm, UploadedFile};
use crate::errors::AssetError;

/// Reads the `path` field and the category's file field from a multipart body.
/// The first file part wins, later ones are drained.
pub async fn read_upload_form(
    req: &HttpRequest,
    payload: web::Payload,
    category: AssetCategory,
    max_file_bytes: usize,
) -> Result<UploadForm, AssetError> {
    let mut multipart = Multipart::new(req.headers(), payload);
    let mut form = UploadForm::default();

    while let Some(mut field) = multipart.try_next().await? {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .filter(|name| !name.is_empty())
            .map(|name| client_file_name(name).to_owned());

        match file_name {
            Some(file_name) if name == category.field_name() && form.file.is_none() => {
                let contents = read_field(&mut field, max_file_bytes).await?;
                form.file = Some(UploadedFile { file_name, contents: contents.freeze() });
            }
            None if name == "path" => {
                form.path = read_text(&mut field).await?;
            }
            _ => drain(&mut field).await?,
        }
    }

    Ok(form)
}

/// Reads `path` and `filename` from either an urlencoded or a multipart body.
pub async fn read_delete_form(req: &HttpRequest, payload: web::Payload) -> Result<DeleteForm, AssetError> {
    if req.content_type().starts_with("multipart/") {
        let mut multipart = Multipart::new(req.headers(), payload);
        let mut form = DeleteForm::default();

        while let Some(mut field) = multipart.try_next().await? {
            let name = field.name().unwrap_or_default().to_owned();
            match name.as_str() {
                "path" => form.path = read_text(&mut field).await?,
                "filename" => form.filename = read_text(&mut field).await?,
                _ => drain(&mut field).await?,
            }
        }

        return Ok(form);
    }

    web::Form::<DeleteForm>::from_request(req, &mut payload.into_inner())
        .await
        .map(|form| form.into_inner())
        .map_err(|e| {
            tracing::debug!("Rejected delete form: {}", e);
            AssetError::InvalidRequest
        })
}

async fn read_field(field: &mut Field, limit: usize) -> Result<BytesMut, AssetError> {
    let mut buf = BytesMut::new();

    while let Some(chunk) = field.try_next().await? {
        if buf.len() + chunk.len() > limit {
            return Err(AssetError::PayloadTooLarge);
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf)
}

async fn read_text(field: &mut Field) -> Result<String, AssetError> {
    let bytes = read_field(field, MAX_TEXT_FIELD_BYTES).await?;
    String::from_utf8(bytes.to_vec()).map_err(|_| AssetError::InvalidRequest)
}

async fn drain(field: &mut Field) -> Result<(), AssetError> {
    while field.try_next().await?.is_some() {}
    Ok(())
}
