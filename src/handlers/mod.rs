/// HTTP handlers for the media upload service
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::video_repo;
use crate::error::{AppError, Result};
use crate::models::Video;

pub mod assets;
pub mod thumbnails;
pub mod videos;

pub use assets::serve_asset;
pub use thumbnails::upload_thumbnail;
pub use videos::{get_video, list_videos, upload_video};

pub(crate) fn parse_video_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid video ID".to_string()))
}

/// Fetch the record and enforce the owner-only mutation invariant.
pub(crate) async fn fetch_owned_video(
    pool: &PgPool,
    video_id: Uuid,
    user_id: Uuid,
) -> Result<Video> {
    let video = video_repo::get_video(pool, video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if !video.is_owned_by(user_id) {
        return Err(AppError::Unauthorized(
            "Caller is not the owner of the video".to_string(),
        ));
    }

    Ok(video)
}
