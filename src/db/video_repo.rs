/// Video repository - database operations for video records
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::Video;

/// Fetch a single video record by id.
pub async fn get_video(pool: &PgPool, video_id: Uuid) -> Result<Option<Video>> {
    let video = sqlx::query_as::<_, Video>(
        "SELECT id, user_id, title, description, thumbnail_url, video_url, \
         created_at, updated_at \
         FROM videos WHERE id = $1",
    )
    .bind(video_id)
    .fetch_optional(pool)
    .await?;

    Ok(video)
}

/// List a user's video records, newest first.
pub async fn list_videos_by_owner(pool: &PgPool, user_id: Uuid) -> Result<Vec<Video>> {
    let videos = sqlx::query_as::<_, Video>(
        "SELECT id, user_id, title, description, thumbnail_url, video_url, \
         created_at, updated_at \
         FROM videos WHERE user_id = $1 \
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(videos)
}

/// Persist both asset locators of a record, returning the updated row.
///
/// Handlers only call this after every validation and I/O step has
/// succeeded, so a failed request never leaves a partial mutation behind.
pub async fn update_video_urls(pool: &PgPool, video: &Video) -> Result<Video> {
    let updated = sqlx::query_as::<_, Video>(
        "UPDATE videos SET thumbnail_url = $2, video_url = $3, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING id, user_id, title, description, thumbnail_url, video_url, \
         created_at, updated_at",
    )
    .bind(video.id)
    .bind(video.thumbnail_url.as_deref())
    .bind(video.video_url.as_deref())
    .fetch_one(pool)
    .await?;

    Ok(updated)
}
