//! Local file system storage implementation

use crate::utils::error::{PipelineError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info};
use uuid::Uuid;

use super::signer::UrlSigner;
use super::types::{FileMetadata, ObjectStorage};

/// Local file storage
///
/// Files live under `{base}/{ref[..2]}/{ref}` with a `{ref}.meta` JSON sidecar.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    signer: UrlSigner,
}

impl LocalStorage {
    /// Create a new local storage instance
    pub async fn new(base_path: &str, signer: UrlSigner) -> Result<Self> {
        let path = PathBuf::from(base_path);

        if !path.exists() {
            fs::create_dir_all(&path).await.map_err(|e| {
                PipelineError::FileStorage(format!("Failed to create storage directory: {}", e))
            })?;
        }

        info!("Local file storage initialized at: {}", path.display());
        Ok(Self {
            base_path: path,
            signer,
        })
    }

    /// Store a file and return its reference
    pub async fn store(&self, filename: &str, content: &[u8], content_type: &str) -> Result<String> {
        let file_id = Uuid::new_v4().to_string();
        let file_path = self.get_file_path(&file_id);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                PipelineError::FileStorage(format!("Failed to create directory: {}", e))
            })?;
        }

        let mut file = fs::File::create(&file_path)
            .await
            .map_err(|e| PipelineError::FileStorage(format!("Failed to create file: {}", e)))?;

        file.write_all(content)
            .await
            .map_err(|e| PipelineError::FileStorage(format!("Failed to write file: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| PipelineError::FileStorage(format!("Failed to flush file: {}", e)))?;

        let metadata = FileMetadata::new(&file_id, filename, content_type, content);
        self.store_metadata(&file_id, &metadata).await?;

        debug!("File stored: {} -> {}", filename, file_id);
        Ok(file_id)
    }

    /// Retrieve file content
    pub async fn load(&self, file_id: &str) -> Result<Vec<u8>> {
        Self::check_ref(file_id)?;
        let file_path = self.get_file_path(file_id);

        if !file_path.exists() {
            return Err(PipelineError::NotFound(format!(
                "File not found: {}",
                file_id
            )));
        }

        let mut file = fs::File::open(&file_path)
            .await
            .map_err(|e| PipelineError::FileStorage(format!("Failed to open file: {}", e)))?;

        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .await
            .map_err(|e| PipelineError::FileStorage(format!("Failed to read file: {}", e)))?;

        Ok(content)
    }

    /// Delete a file and its metadata
    pub async fn delete(&self, file_id: &str) -> Result<()> {
        Self::check_ref(file_id)?;
        let file_path = self.get_file_path(file_id);
        let metadata_path = self.get_metadata_path(file_id);

        if file_path.exists() {
            fs::remove_file(&file_path)
                .await
                .map_err(|e| PipelineError::FileStorage(format!("Failed to delete file: {}", e)))?;
        }

        if metadata_path.exists() {
            fs::remove_file(&metadata_path).await.map_err(|e| {
                PipelineError::FileStorage(format!("Failed to delete metadata: {}", e))
            })?;
        }

        debug!("File deleted: {}", file_id);
        Ok(())
    }

    /// Check if file exists
    pub async fn exists(&self, file_id: &str) -> Result<bool> {
        if Self::check_ref(file_id).is_err() {
            return Ok(false);
        }
        Ok(self.get_file_path(file_id).exists())
    }

    /// Get file metadata
    pub async fn metadata(&self, file_id: &str) -> Result<FileMetadata> {
        Self::check_ref(file_id)?;
        let metadata_path = self.get_metadata_path(file_id);

        if !metadata_path.exists() {
            return Err(PipelineError::NotFound(format!(
                "File metadata not found: {}",
                file_id
            )));
        }

        let content = fs::read_to_string(&metadata_path)
            .await
            .map_err(|e| PipelineError::FileStorage(format!("Failed to read metadata: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| PipelineError::FileStorage(format!("Failed to parse metadata: {}", e)))
    }

    /// References are UUIDs; anything else could escape the base directory
    fn check_ref(file_id: &str) -> Result<()> {
        Uuid::parse_str(file_id)
            .map(|_| ())
            .map_err(|_| PipelineError::NotFound(format!("File not found: {}", file_id)))
    }

    fn get_file_path(&self, file_id: &str) -> PathBuf {
        let subdir = &file_id[..2.min(file_id.len())];
        self.base_path.join(subdir).join(file_id)
    }

    fn get_metadata_path(&self, file_id: &str) -> PathBuf {
        let subdir = &file_id[..2.min(file_id.len())];
        self.base_path
            .join(subdir)
            .join(format!("{}.meta", file_id))
    }

    async fn store_metadata(&self, file_id: &str, metadata: &FileMetadata) -> Result<()> {
        let metadata_path = self.get_metadata_path(file_id);

        let content = serde_json::to_string_pretty(metadata).map_err(|e| {
            PipelineError::FileStorage(format!("Failed to serialize metadata: {}", e))
        })?;

        fs::write(&metadata_path, content)
            .await
            .map_err(|e| PipelineError::FileStorage(format!("Failed to write metadata: {}", e)))
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn put(&self, content: &[u8], name: &str, content_type: &str) -> Result<String> {
        self.store(name, content, content_type).await
    }

    async fn get(&self, file_ref: &str) -> Result<Vec<u8>> {
        self.load(file_ref).await
    }

    async fn sign(&self, file_ref: &str, ttl: Duration) -> Result<String> {
        if !self.exists(file_ref).await? {
            return Err(PipelineError::NotFound(format!(
                "File not found: {}",
                file_ref
            )));
        }
        self.signer.sign(file_ref, ttl)
    }
}
