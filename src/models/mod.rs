/// Data models for the media upload service
///
/// The `Video` entity is the single persisted record: owner, descriptive
/// fields, and the two optional asset locators written by the upload
/// handlers. Its serialization is the success envelope for every endpoint.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Video database entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// URL or inline data URL of the thumbnail, set on thumbnail upload.
    pub thumbnail_url: Option<String>,
    /// Public object-store URL of the processed video, set on video upload.
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// Whether `user_id` owns this record. Only the owner may mutate the
    /// asset locators.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(owner: Uuid) -> Video {
        Video {
            id: Uuid::new_v4(),
            user_id: owner,
            title: "clip".to_string(),
            description: None,
            thumbnail_url: None,
            video_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn ownership_check() {
        let owner = Uuid::new_v4();
        let video = sample(owner);
        assert!(video.is_owned_by(owner));
        assert!(!video.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn serializes_nullable_locators() {
        let video = sample(Uuid::new_v4());
        let json = serde_json::to_value(&video).unwrap();
        assert!(json.get("thumbnail_url").unwrap().is_null());
        assert!(json.get("video_url").unwrap().is_null());
    }
}
