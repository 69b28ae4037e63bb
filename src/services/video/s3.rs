/// S3 upload for processed video files
use std::path::Path;

use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::config::S3Config;
use crate::error::{AppError, Result};

/// Initialize the S3 client with credentials from config.
///
/// Falls back to the default credential chain when no static keys are
/// configured; a custom endpoint enables S3-compatible stores like MinIO.
pub async fn get_s3_client(config: &S3Config) -> Client {
    let mut builder = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.region.clone()));

    if let (Some(access_key_id), Some(secret_access_key)) =
        (&config.access_key_id, &config.secret_access_key)
    {
        let credentials = Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "media_upload_s3",
        );
        builder = builder.credentials_provider(credentials);
    }

    if let Some(endpoint) = &config.endpoint {
        builder = builder.endpoint_url(endpoint);
    }

    let aws_config = builder.load().await;
    Client::new(&aws_config)
}

/// Upload a local file to the configured bucket under `key`.
pub async fn upload_file(
    client: &Client,
    config: &S3Config,
    local_path: &Path,
    key: &str,
    content_type: &str,
) -> Result<()> {
    let body = ByteStream::from_path(local_path).await.map_err(|e| {
        AppError::Storage(format!("Failed to read {}: {e}", local_path.display()))
    })?;

    client
        .put_object()
        .bucket(&config.bucket)
        .key(key)
        .body(body)
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

    Ok(())
}

/// Public retrieval URL for an uploaded object.
pub fn public_url(config: &S3Config, key: &str) -> String {
    format!(
        "https://{}.s3.{}.amazonaws.com/{}",
        config.bucket, config.region, key
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_includes_bucket_region_and_key() {
        let config = S3Config {
            bucket: "media-uploads".to_string(),
            region: "eu-west-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
            endpoint: None,
        };
        assert_eq!(
            public_url(&config, "landscape/abc123.mp4"),
            "https://media-uploads.s3.eu-west-1.amazonaws.com/landscape/abc123.mp4"
        );
    }
}
