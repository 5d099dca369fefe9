//! File storage types and traits

use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "s3")]
use super::S3Storage;
use super::{LocalStorage, MemoryStorage};

/// Blob storage as seen by the pipeline
///
/// References returned by `put` are opaque to callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store bytes under a display name and return their reference
    async fn put(&self, content: &[u8], name: &str, content_type: &str) -> Result<String>;

    /// Load bytes by reference
    async fn get(&self, file_ref: &str) -> Result<Vec<u8>>;

    /// Issue a download URL valid for `ttl`
    async fn sign(&self, file_ref: &str, ttl: Duration) -> Result<String>;
}

/// File storage backend
#[derive(Debug, Clone)]
pub enum FileStorage {
    /// Local file system storage
    Local(LocalStorage),
    /// Process memory, lost on exit
    Memory(MemoryStorage),
    /// Amazon S3 or compatible storage
    #[cfg(feature = "s3")]
    S3(S3Storage),
}

/// File metadata
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FileMetadata {
    /// Storage reference
    pub id: String,
    /// Name the file was stored under
    pub filename: String,
    /// MIME content type
    pub content_type: String,
    /// File size in bytes
    pub size: u64,
    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// SHA-256 of the content, hex encoded
    pub checksum: String,
}

impl FileMetadata {
    pub(crate) fn new(id: &str, filename: &str, content_type: &str, content: &[u8]) -> Self {
        let content_type = if content_type.trim().is_empty() {
            detect_content_type(filename)
        } else {
            content_type.to_string()
        };
        Self {
            id: id.to_string(),
            filename: filename.to_string(),
            content_type,
            size: content.len() as u64,
            created_at: chrono::Utc::now(),
            checksum: calculate_checksum(content),
        }
    }
}

/// Detect content type from filename
pub(crate) fn detect_content_type(filename: &str) -> String {
    match Path::new(filename).extension().and_then(|ext| ext.to_str()) {
        Some("csv") => "text/csv".to_string(),
        Some("xlsx") => {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string()
        }
        Some("xls") => "application/vnd.ms-excel".to_string(),
        Some("json") => "application/json".to_string(),
        Some("txt") => "text/plain".to_string(),
        _ => "application/octet-stream".to_string(),
    }
}

/// Calculate file checksum
pub(crate) fn calculate_checksum(content: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
