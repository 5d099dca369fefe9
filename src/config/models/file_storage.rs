//! File storage configuration

use super::{default_local_path, default_public_base_url};
use serde::{Deserialize, Serialize};

/// File storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileStorageConfig {
    /// Storage type (local, memory, s3)
    pub storage_type: String,
    /// Local storage path
    #[serde(default)]
    pub local_path: Option<String>,
    /// Base URL that signed download links are issued under
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Secret used to sign download links for local and memory storage
    #[serde(default)]
    pub signing_secret: Option<String>,
    /// S3 configuration
    #[serde(default)]
    pub s3: Option<S3Config>,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            storage_type: "local".to_string(),
            local_path: Some(default_local_path()),
            public_base_url: default_public_base_url(),
            signing_secret: None,
            s3: None,
        }
    }
}

impl FileStorageConfig {
    /// In-memory storage, mostly useful for tests and dry runs
    pub fn memory() -> Self {
        Self {
            storage_type: "memory".to_string(),
            local_path: None,
            ..Self::default()
        }
    }

    /// Merge file storage configurations (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        if other.storage_type != "local" {
            self.storage_type = other.storage_type;
        }
        if other.local_path.is_some() && other.local_path != Some(default_local_path()) {
            self.local_path = other.local_path;
        }
        if other.public_base_url != default_public_base_url() {
            self.public_base_url = other.public_base_url;
        }
        if other.signing_secret.is_some() {
            self.signing_secret = other.signing_secret;
        }
        if other.s3.is_some() {
            self.s3 = other.s3;
        }
        self
    }
}

/// S3 configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// S3 bucket name
    pub bucket: String,
    /// AWS region
    pub region: String,
    /// Key prefix for every stored object
    #[serde(default)]
    pub key_prefix: Option<String>,
    /// Endpoint URL (for S3-compatible services)
    #[serde(default)]
    pub endpoint: Option<String>,
}
