/// Serves disk-stored thumbnails back to clients
use std::io;
use std::path::Path;

use actix_web::{web, HttpResponse};

use crate::config::Config;
use crate::error::{AppError, Result};

/// `GET /assets/{name}` - unauthenticated read of a stored thumbnail.
pub async fn serve_asset(
    config: web::Data<Config>,
    name: web::Path<String>,
) -> Result<HttpResponse> {
    let name = name.into_inner();

    // Names are generated by the disk store; anything path-like is hostile.
    if name.contains(['/', '\\']) || name.contains("..") {
        return Err(AppError::BadRequest("Invalid asset name".to_string()));
    }

    let path = Path::new(&config.assets.root).join(&name);
    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("Asset not found".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let media_type = mime_guess::from_path(&name).first_or_octet_stream();
    Ok(HttpResponse::Ok()
        .content_type(media_type.as_ref())
        .body(data))
}
