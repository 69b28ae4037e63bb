/// Configuration management for the media upload service
///
/// Loads configuration from environment variables with sensible defaults.
/// The loaded `Config` is handed to handlers as explicit state, never read
/// from ambient globals.
use serde::Deserialize;

use crate::services::storage::ThumbnailStorageKind;

#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
    pub s3: S3Config,
    pub assets: AssetsConfig,
    pub media_tools: MediaToolsConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub env: String,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub endpoint: Option<String>,
}

/// Where thumbnails land and how they are addressed afterwards.
#[derive(Clone, Debug)]
pub struct AssetsConfig {
    pub storage: ThumbnailStorageKind,
    pub root: String,
    pub base_url: String,
}

#[derive(Clone, Debug)]
pub struct MediaToolsConfig {
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let port: u16 = std::env::var("MEDIA_UPLOAD_PORT")
            .unwrap_or_else(|_| "8082".to_string())
            .parse()
            .unwrap_or(8082);

        let storage = match std::env::var("THUMBNAIL_STORAGE").as_deref() {
            Ok("inline") => ThumbnailStorageKind::Inline,
            _ => ThumbnailStorageKind::Disk,
        };

        Ok(Config {
            app: AppConfig {
                host: std::env::var("MEDIA_UPLOAD_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            },
            auth: AuthConfig {
                jwt_secret: std::env::var("JWT_SECRET")?,
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/media".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            },
            s3: S3Config {
                bucket: std::env::var("S3_BUCKET").unwrap_or_else(|_| "media-uploads".to_string()),
                region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                access_key_id: std::env::var("AWS_ACCESS_KEY_ID").ok(),
                secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").ok(),
                endpoint: std::env::var("S3_ENDPOINT").ok(),
            },
            assets: AssetsConfig {
                storage,
                root: std::env::var("ASSETS_ROOT").unwrap_or_else(|_| "./assets".to_string()),
                base_url: std::env::var("ASSETS_BASE_URL")
                    .unwrap_or_else(|_| format!("http://localhost:{port}")),
            },
            media_tools: MediaToolsConfig {
                ffprobe_path: std::env::var("FFPROBE_PATH")
                    .unwrap_or_else(|_| "ffprobe".to_string()),
                ffmpeg_path: std::env::var("FFMPEG_PATH")
                    .unwrap_or_else(|_| "ffmpeg".to_string()),
            },
        })
    }
}
