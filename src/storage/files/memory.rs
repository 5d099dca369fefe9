//! In-memory object storage

use crate::utils::error::{PipelineError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use super::signer::UrlSigner;
use super::types::{FileMetadata, ObjectStorage};

#[derive(Debug, Clone)]
struct StoredObject {
    content: Arc<Vec<u8>>,
    metadata: FileMetadata,
}

/// Object storage kept in process memory; clones share the same objects
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    objects: Arc<DashMap<String, StoredObject>>,
    signer: UrlSigner,
}

impl MemoryStorage {
    pub fn new(signer: UrlSigner) -> Self {
        Self {
            objects: Arc::new(DashMap::new()),
            signer,
        }
    }

    /// Metadata of a stored object
    pub fn metadata(&self, file_ref: &str) -> Result<FileMetadata> {
        self.objects
            .get(file_ref)
            .map(|entry| entry.metadata.clone())
            .ok_or_else(|| PipelineError::NotFound(format!("File not found: {}", file_ref)))
    }

    /// Metadata of every stored object, oldest first
    pub fn list(&self) -> Vec<FileMetadata> {
        let mut all: Vec<FileMetadata> = self
            .objects
            .iter()
            .map(|entry| entry.metadata.clone())
            .collect();
        all.sort_by_key(|m| m.created_at);
        all
    }

    pub fn exists(&self, file_ref: &str) -> bool {
        self.objects.contains_key(file_ref)
    }

    pub fn delete(&self, file_ref: &str) -> bool {
        self.objects.remove(file_ref).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put(&self, content: &[u8], name: &str, content_type: &str) -> Result<String> {
        let file_ref = Uuid::new_v4().to_string();
        let metadata = FileMetadata::new(&file_ref, name, content_type, content);
        self.objects.insert(
            file_ref.clone(),
            StoredObject {
                content: Arc::new(content.to_vec()),
                metadata,
            },
        );
        debug!("File stored in memory: {} -> {}", name, file_ref);
        Ok(file_ref)
    }

    async fn get(&self, file_ref: &str) -> Result<Vec<u8>> {
        self.objects
            .get(file_ref)
            .map(|entry| entry.content.as_ref().clone())
            .ok_or_else(|| PipelineError::NotFound(format!("File not found: {}", file_ref)))
    }

    async fn sign(&self, file_ref: &str, ttl: Duration) -> Result<String> {
        if !self.exists(file_ref) {
            return Err(PipelineError::NotFound(format!(
                "File not found: {}",
                file_ref
            )));
        }
        self.signer.sign(file_ref, ttl)
    }
}
