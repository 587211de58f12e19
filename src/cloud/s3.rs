use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use rusoto_core::ByteStream;
use rusoto_s3::{PutObjectRequest, S3Client, S3};

use crate::config::AwsConfig;

/// Write access to an object storage bucket.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` as a single object at `bucket`/`key`.
    async fn write_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;
}

/// Builds an authenticated [`ObjectStore`] from region and credentials.
#[cfg_attr(test, mockall::automock)]
pub trait StorageConnector: Send + Sync {
    fn object_store(&self, aws: &AwsConfig) -> Result<Arc<dyn ObjectStore>>;
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn write_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        let size = body.len();
        let request = PutObjectRequest {
            bucket: bucket.to_string(),
            key: key.to_string(),
            body: Some(ByteStream::from(body)),
            ..Default::default()
        };

        S3::put_object(self, request)
            .await
            .context("PutObject request failed")?;

        debug!("Wrote {} bytes to s3://{}/{}", size, bucket, key);
        Ok(())
    }
}
