/// Video endpoints: record reads and the upload-and-transcode pipeline
use std::io::Write;

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::StreamExt;
use sqlx::PgPool;
use tempfile::NamedTempFile;

use crate::config::Config;
use crate::db::video_repo;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::services::storage;
use crate::services::video::processor::VideoProcessor;
use crate::services::video::s3;

/// Upload body cap: 1 GiB.
const MAX_VIDEO_BYTES: usize = 1 << 30;
const VIDEO_FIELD: &str = "video";
const VIDEO_MEDIA_TYPE: &str = "video/mp4";

/// `GET /videos` - the caller's records, newest first.
pub async fn list_videos(pool: web::Data<PgPool>, user: UserId) -> Result<HttpResponse> {
    let videos = video_repo::list_videos_by_owner(pool.get_ref(), user.0).await?;
    Ok(HttpResponse::Ok().json(videos))
}

/// `GET /videos/{video_id}`
pub async fn get_video(
    pool: web::Data<PgPool>,
    video_id: web::Path<String>,
) -> Result<HttpResponse> {
    let video_id = super::parse_video_id(&video_id)?;
    let video = video_repo::get_video(pool.get_ref(), video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    Ok(HttpResponse::Ok().json(video))
}

/// `POST /videos/{video_id}/video`
///
/// Copies the uploaded stream to a scoped temp file, classifies its aspect
/// ratio, remuxes for fast start, uploads the processed copy to S3 under
/// an aspect-namespaced random key, and records the public URL. Any
/// failure aborts before the record update; both temp files are removed
/// on every exit path when their guards drop.
pub async fn upload_video(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    s3_client: web::Data<aws_sdk_s3::Client>,
    processor: web::Data<VideoProcessor>,
    user: UserId,
    video_id: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let video_id = super::parse_video_id(&video_id)?;
    let mut video = super::fetch_owned_video(pool.get_ref(), video_id, user.0).await?;

    tracing::info!(%video_id, user_id = %user.0, "uploading video");

    let upload = spool_video_part(payload).await?;

    let dims = processor.probe_dimensions(upload.path())?;
    let aspect = VideoProcessor::classify_aspect(dims);
    let processed = processor.remux_faststart(upload.path())?;

    let key = format!("{}/{}.mp4", aspect.as_str(), storage::random_asset_name());
    s3::upload_file(
        s3_client.get_ref(),
        &config.s3,
        &processed,
        &key,
        VIDEO_MEDIA_TYPE,
    )
    .await?;

    tracing::info!(%video_id, %key, aspect = aspect.as_str(), "video uploaded");

    video.video_url = Some(s3::public_url(&config.s3, &key));
    let updated = video_repo::update_video_urls(pool.get_ref(), &video).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Copy the `video` multipart part into a named temp file, enforcing the
/// declared media type and the body cap while streaming.
async fn spool_video_part(mut payload: Multipart) -> Result<NamedTempFile> {
    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?;

        if field.name() != VIDEO_FIELD {
            continue;
        }

        let media_type = field
            .content_type()
            .cloned()
            .ok_or_else(|| AppError::BadRequest("Missing content type".to_string()))?;
        if media_type.essence_str() != VIDEO_MEDIA_TYPE {
            return Err(AppError::BadRequest("Invalid file type".to_string()));
        }

        let mut spool = NamedTempFile::new()?;
        let mut written = 0usize;
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::BadRequest(format!("Upload read error: {e}")))?;
            written += chunk.len();
            if written > MAX_VIDEO_BYTES {
                return Err(AppError::BadRequest(
                    "Video exceeds 1 GiB limit".to_string(),
                ));
            }
            spool.write_all(&chunk)?;
        }
        spool.flush()?;

        return Ok(spool);
    }

    Err(AppError::BadRequest("Missing video form field".to_string()))
}
