use actix_web::{delete, post, web, HttpRequest, HttpResponse};

use crate::entities::asset::{AssetCategory, AssetResponse};
use crate::errors::AssetError;
use crate::handlers::forms::{read_delete_form, read_upload_form};
use crate::use_cases::extractors::RequestOrigin;
use crate::AppState;

#[post("/upload_image")]
pub async fn upload_image(
    state: web::Data<AppState>,
    origin: RequestOrigin,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AssetError> {
    upload(state, AssetCategory::Image, origin, req, payload).await
}

#[post("/upload_file")]
pub async fn upload_file(
    state: web::Data<AppState>,
    origin: RequestOrigin,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AssetError> {
    upload(state, AssetCategory::File, origin, req, payload).await
}

#[delete("/delete_image")]
pub async fn delete_image(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AssetError> {
    remove(state, AssetCategory::Image, req, payload).await
}

#[delete("/delete_file")]
pub async fn delete_file(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AssetError> {
    remove(state, AssetCategory::File, req, payload).await
}

async fn upload(
    state: web::Data<AppState>,
    category: AssetCategory,
    origin: RequestOrigin,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AssetError> {
    let form = read_upload_form(&req, payload, category, state.max_upload_bytes).await?;
    let stored = state.asset_handler.upload(category, form, &origin).await?;

    Ok(HttpResponse::Ok().json(AssetResponse::uploaded(stored)))
}

async fn remove(
    state: web::Data<AppState>,
    category: AssetCategory,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AssetError> {
    let form = read_delete_form(&req, payload).await?;
    state.asset_handler.delete(category, form).await?;

    Ok(HttpResponse::Ok().json(AssetResponse::deleted(category)))
}
