/// Thumbnail storage strategies
///
/// The thumbnail handler persists bytes through a `ThumbnailStore` and
/// writes whatever locator comes back onto the record. Two mutually
/// exclusive strategies exist: inline base64 data URLs embedded in the
/// record, and uniquely named files under a configured assets root. The
/// strategy is chosen once at startup from configuration.
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use bytes::Bytes;
use mime::Mime;
use rand::RngCore;

use crate::config::AssetsConfig;
use crate::error::{AppError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThumbnailStorageKind {
    Inline,
    Disk,
}

#[async_trait]
pub trait ThumbnailStore: Send + Sync {
    /// Persist thumbnail bytes, returning the locator to record.
    async fn store(&self, data: Bytes, media_type: &Mime) -> Result<String>;
}

/// Embeds the thumbnail in the record itself as a base64 data URL.
/// No filesystem side effect.
pub struct InlineThumbnailStore;

#[async_trait]
impl ThumbnailStore for InlineThumbnailStore {
    async fn store(&self, data: Bytes, media_type: &Mime) -> Result<String> {
        let encoded = STANDARD.encode(&data);
        Ok(format!("data:{};base64,{encoded}", media_type.essence_str()))
    }
}

/// Writes the thumbnail under the assets root with a random name and
/// returns the public URL it will be served from.
pub struct DiskThumbnailStore {
    root: PathBuf,
    base_url: String,
}

impl DiskThumbnailStore {
    pub fn new(assets: &AssetsConfig) -> Self {
        Self {
            root: PathBuf::from(&assets.root),
            base_url: assets.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ThumbnailStore for DiskThumbnailStore {
    async fn store(&self, data: Bytes, media_type: &Mime) -> Result<String> {
        let ext = extension_for(media_type).ok_or_else(|| {
            AppError::Storage(format!("No extension for media type {media_type}"))
        })?;
        let file_name = format!("{}{ext}", random_asset_name());

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&file_name), &data).await?;

        Ok(format!("{}/assets/{file_name}", self.base_url))
    }
}

/// Build the configured strategy.
pub fn build_store(assets: &AssetsConfig) -> Arc<dyn ThumbnailStore> {
    match assets.storage {
        ThumbnailStorageKind::Inline => Arc::new(InlineThumbnailStore),
        ThumbnailStorageKind::Disk => Arc::new(DiskThumbnailStore::new(assets)),
    }
}

/// 32 random bytes, base64url-encoded without padding. Used for asset
/// file names and object-store keys.
pub fn random_asset_name() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn extension_for(media_type: &Mime) -> Option<&'static str> {
    match media_type.essence_str() {
        "image/jpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets_config(root: &str) -> AssetsConfig {
        AssetsConfig {
            storage: ThumbnailStorageKind::Disk,
            root: root.to_string(),
            base_url: "http://localhost:8082/".to_string(),
        }
    }

    #[tokio::test]
    async fn inline_store_roundtrips_bytes() {
        let data = Bytes::from_static(b"\x89PNG\r\n\x1a\nfake image bytes");
        let locator = InlineThumbnailStore
            .store(data.clone(), &mime::IMAGE_PNG)
            .await
            .unwrap();

        let payload = locator
            .strip_prefix("data:image/png;base64,")
            .expect("data URL prefix");
        assert_eq!(STANDARD.decode(payload).unwrap(), data.to_vec());
    }

    #[tokio::test]
    async fn disk_store_writes_uploaded_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskThumbnailStore::new(&assets_config(dir.path().to_str().unwrap()));

        let data = Bytes::from_static(b"\xff\xd8\xffjpeg body");
        let locator = store.store(data.clone(), &mime::IMAGE_JPEG).await.unwrap();

        let file_name = locator.rsplit('/').next().unwrap();
        assert!(file_name.ends_with(".jpg"));
        assert!(locator.starts_with("http://localhost:8082/assets/"));

        let on_disk = std::fs::read(dir.path().join(file_name)).unwrap();
        assert_eq!(on_disk, data.to_vec());
    }

    #[test]
    fn random_names_are_url_safe_and_unique() {
        let a = random_asset_name();
        let b = random_asset_name();
        // 32 bytes -> 43 base64url chars, no padding
        assert_eq!(a.len(), 43);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(a, b);
    }

    #[test]
    fn only_jpeg_and_png_get_extensions() {
        assert_eq!(extension_for(&mime::IMAGE_JPEG), Some(".jpg"));
        assert_eq!(extension_for(&mime::IMAGE_PNG), Some(".png"));
        assert_eq!(extension_for(&mime::IMAGE_GIF), None);
        assert_eq!(extension_for(&mime::TEXT_PLAIN), None);
    }
}
