use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::Client as S3Client;
use std::path::Path;

use crate::config::StorageConfig;

/// S3 upload sink for finished clips
///
/// Uploads are best-effort at the orchestration layer: callers fall back to
/// the local path when no sink is configured or an upload fails.
pub struct StorageSink {
    client: S3Client,
    bucket: String,
    region: String,
    key_prefix: String,
}

impl StorageSink {
    /// Connect a sink from storage configuration
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        Ok(Self {
            client: S3Client::new(&aws_config),
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            key_prefix: config.key_prefix.clone().unwrap_or_default(),
        })
    }

    /// Upload a clip and return its public URL
    pub async fn upload(&self, local_path: &Path, file_name: &str) -> Result<String> {
        let key = format!("{}{}", self.key_prefix, file_name);

        tracing::info!("Uploading clip to S3: s3://{}/{}", self.bucket, key);

        let content = fs_err::read(local_path)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(content.into())
            .content_type("video/mp4")
            .send()
            .await
            .context("Failed to upload clip to S3")?;

        Ok(format!(
            "https://{}.s3.{}.amazonaws.com/{}{}",
            self.bucket,
            self.region,
            self.key_prefix,
            urlencoding::encode(file_name)
        ))
    }
}
