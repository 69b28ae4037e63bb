/// Thumbnail upload handler
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use bytes::Bytes;
use futures::StreamExt;
use mime::Mime;
use sqlx::PgPool;

use crate::db::video_repo;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::services::storage::ThumbnailStore;

/// Thumbnails are small; cap the part at 10 MiB.
const MAX_THUMBNAIL_BYTES: usize = 10 << 20;
const THUMBNAIL_FIELD: &str = "thumbnail";

/// `POST /videos/{video_id}/thumbnail`
///
/// Persists the uploaded thumbnail through the configured storage
/// strategy and records the resulting locator. The record update is the
/// last step, after every validation and I/O step has succeeded.
pub async fn upload_thumbnail(
    pool: web::Data<PgPool>,
    store: web::Data<dyn ThumbnailStore>,
    user: UserId,
    video_id: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let video_id = super::parse_video_id(&video_id)?;
    let mut video = super::fetch_owned_video(pool.get_ref(), video_id, user.0).await?;

    tracing::info!(%video_id, user_id = %user.0, "uploading thumbnail");

    let (data, media_type) = read_thumbnail_part(payload).await?;

    if !is_accepted_thumbnail_type(&media_type) {
        return Err(AppError::BadRequest("Invalid file type".to_string()));
    }

    let locator = store.store(data, &media_type).await?;
    video.thumbnail_url = Some(locator);

    let updated = video_repo::update_video_urls(pool.get_ref(), &video).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Exactly the two accepted image types; everything else is a 400.
fn is_accepted_thumbnail_type(media_type: &Mime) -> bool {
    matches!(media_type.essence_str(), "image/jpeg" | "image/png")
}

/// Read the `thumbnail` part into memory along with its declared type.
async fn read_thumbnail_part(mut payload: Multipart) -> Result<(Bytes, Mime)> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?;

        if field.name() != THUMBNAIL_FIELD {
            continue;
        }

        let media_type = field
            .content_type()
            .cloned()
            .ok_or_else(|| AppError::BadRequest("Missing content type".to_string()))?;

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::BadRequest(format!("Upload read error: {e}")))?;
            if data.len() + chunk.len() > MAX_THUMBNAIL_BYTES {
                return Err(AppError::BadRequest(
                    "Thumbnail exceeds 10 MiB limit".to_string(),
                ));
            }
            data.extend_from_slice(&chunk);
        }

        return Ok((Bytes::from(data), media_type));
    }

    Err(AppError::BadRequest(
        "Missing thumbnail form field".to_string(),
    ))
}
