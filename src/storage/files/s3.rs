//! Amazon S3 storage implementation

use crate::config::S3Config;
use crate::utils::error::{PipelineError, Result};
use async_trait::async_trait;
use aws_sdk_s3 as aws_s3;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use super::types::ObjectStorage;

/// S3 file storage; references are object keys
#[derive(Debug, Clone)]
pub struct S3Storage {
    bucket: String,
    key_prefix: Option<String>,
    client: aws_s3::Client,
}

impl S3Storage {
    /// Create a new S3 storage instance
    pub async fn new(config: &S3Config) -> Result<Self> {
        use aws_s3::config::Region;

        let region = Region::new(config.region.clone());
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        let mut builder = aws_s3::config::Builder::from(&aws_config);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        let client = aws_s3::Client::from_conf(builder.build());

        info!(
            "S3 file storage initialized: bucket={}, region={}",
            config.bucket, config.region
        );

        Ok(Self {
            bucket: config.bucket.clone(),
            key_prefix: config
                .key_prefix
                .as_ref()
                .map(|p| p.trim_matches('/').to_string())
                .filter(|p| !p.is_empty()),
            client,
        })
    }

    fn object_key(&self, filename: &str) -> String {
        let id = Uuid::new_v4();
        match &self.key_prefix {
            Some(prefix) => format!("{}/{}/{}", prefix, id, filename),
            None => format!("{}/{}", id, filename),
        }
    }

    /// Delete an object
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| PipelineError::FileStorage(format!("S3 deletion failed: {}", e)))?;

        debug!("File deleted from S3: {}", key);
        Ok(())
    }

    /// Check whether an object exists
    pub async fn exists(&self, key: &str) -> Result<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(PipelineError::FileStorage(format!(
                        "S3 head request failed: {}",
                        service_error
                    )))
                }
            }
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(&self, content: &[u8], name: &str, content_type: &str) -> Result<String> {
        let key = self.object_key(name);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(content.to_vec()))
            .send()
            .await
            .map_err(|e| PipelineError::FileStorage(format!("S3 upload failed: {}", e)))?;

        debug!("File uploaded to S3: {}", key);
        Ok(key)
    }

    async fn get(&self, file_ref: &str) -> Result<Vec<u8>> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(file_ref)
            .send()
            .await
            .map_err(|e| PipelineError::FileStorage(format!("S3 download failed: {}", e)))?;

        let bytes = result.body.collect().await.map_err(|e| {
            PipelineError::FileStorage(format!("Failed to read S3 content: {}", e))
        })?;

        Ok(bytes.to_vec())
    }

    async fn sign(&self, file_ref: &str, ttl: Duration) -> Result<String> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| PipelineError::FileStorage(format!("Invalid presign lifetime: {}", e)))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(file_ref)
            .presigned(presigning)
            .await
            .map_err(|e| PipelineError::FileStorage(format!("S3 presign failed: {}", e)))?;

        Ok(request.uri().to_string())
    }
}
