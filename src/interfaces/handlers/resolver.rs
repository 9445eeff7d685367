use actix_files::NamedFile;
use actix_web::{web, HttpRequest};

use crate::use_cases::resolver::ResolvedAsset;
use crate::AppState;

/// Catch-all GET: image root, then file root, then the placeholder.
pub async fn serve_asset(state: web::Data<AppState>, req: HttpRequest) -> actix_web::Result<NamedFile> {
    let request_path = urlencoding::decode(req.path())
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| req.path().to_owned());

    let resolved = state.resolver.resolve(&request_path).await;
    if let ResolvedAsset::Placeholder(path) = &resolved {
        tracing::debug!(request = %request_path, placeholder = %path.display(), "Serving placeholder");
    }

    Ok(NamedFile::open_async(resolved.path()).await?)
}
