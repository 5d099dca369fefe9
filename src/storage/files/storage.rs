//! FileStorage enum implementation with dispatch methods

use crate::config::FileStorageConfig;
use crate::utils::error::{PipelineError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use super::local::LocalStorage;
use super::memory::MemoryStorage;
#[cfg(feature = "s3")]
use super::s3::S3Storage;
use super::signer::UrlSigner;
use super::types::{FileStorage, ObjectStorage};

impl FileStorage {
    /// Create a new file storage instance
    pub async fn new(config: &FileStorageConfig) -> Result<Self> {
        info!("Initializing file storage: {}", config.storage_type);

        match config.storage_type.as_str() {
            "local" => {
                let path = config
                    .local_path
                    .as_ref()
                    .ok_or_else(|| PipelineError::Config("Local path not specified".to_string()))?;
                let signer = Self::signer(config)?;
                Ok(FileStorage::Local(LocalStorage::new(path, signer).await?))
            }
            "memory" => Ok(FileStorage::Memory(MemoryStorage::new(Self::signer(config)?))),
            #[cfg(feature = "s3")]
            "s3" => {
                let s3_config = config.s3.as_ref().ok_or_else(|| {
                    PipelineError::Config("S3 configuration not specified".to_string())
                })?;
                Ok(FileStorage::S3(S3Storage::new(s3_config).await?))
            }
            #[cfg(not(feature = "s3"))]
            "s3" => Err(PipelineError::Config(
                "S3 storage requires the `s3` feature".to_string(),
            )),
            _ => Err(PipelineError::Config(format!(
                "Unsupported storage type: {}",
                config.storage_type
            ))),
        }
    }

    fn signer(config: &FileStorageConfig) -> Result<UrlSigner> {
        UrlSigner::new(&config.public_base_url, config.signing_secret.as_deref())
    }

    /// Delete a stored object
    pub async fn delete(&self, file_ref: &str) -> Result<()> {
        match self {
            FileStorage::Local(storage) => storage.delete(file_ref).await,
            FileStorage::Memory(storage) => {
                storage.delete(file_ref);
                Ok(())
            }
            #[cfg(feature = "s3")]
            FileStorage::S3(storage) => storage.delete(file_ref).await,
        }
    }

    /// Check if an object exists
    pub async fn exists(&self, file_ref: &str) -> Result<bool> {
        match self {
            FileStorage::Local(storage) => storage.exists(file_ref).await,
            FileStorage::Memory(storage) => Ok(storage.exists(file_ref)),
            #[cfg(feature = "s3")]
            FileStorage::S3(storage) => storage.exists(file_ref).await,
        }
    }
}

#[async_trait]
impl ObjectStorage for FileStorage {
    async fn put(&self, content: &[u8], name: &str, content_type: &str) -> Result<String> {
        match self {
            FileStorage::Local(storage) => storage.put(content, name, content_type).await,
            FileStorage::Memory(storage) => storage.put(content, name, content_type).await,
            #[cfg(feature = "s3")]
            FileStorage::S3(storage) => storage.put(content, name, content_type).await,
        }
    }

    async fn get(&self, file_ref: &str) -> Result<Vec<u8>> {
        match self {
            FileStorage::Local(storage) => storage.get(file_ref).await,
            FileStorage::Memory(storage) => storage.get(file_ref).await,
            #[cfg(feature = "s3")]
            FileStorage::S3(storage) => storage.get(file_ref).await,
        }
    }

    async fn sign(&self, file_ref: &str, ttl: Duration) -> Result<String> {
        match self {
            FileStorage::Local(storage) => storage.sign(file_ref, ttl).await,
            FileStorage::Memory(storage) => storage.sign(file_ref, ttl).await,
            #[cfg(feature = "s3")]
            FileStorage::S3(storage) => storage.sign(file_ref, ttl).await,
        }
    }
}
