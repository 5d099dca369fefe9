//! Top-level service configuration

use super::*;
use crate::core::codec::FileFormat;
use crate::utils::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "IMEXPORT_";

/// Complete service configuration as it appears in the YAML file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    /// Pipeline runtime settings
    #[serde(default)]
    pub runtime: RuntimeConfig,
    /// Object storage for uploaded sources and generated artifacts
    #[serde(default)]
    pub file_storage: FileStorageConfig,
    /// Where task records live
    #[serde(default)]
    pub task_store: TaskStoreConfig,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Build configuration from `IMEXPORT_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(format) = env_var("FORMAT") {
            config.runtime.default_format = format.parse::<FileFormat>()?;
        }
        if let Some(value) = env_var("MAX_CONCURRENT_TASKS") {
            config.runtime.max_concurrent_tasks = value.parse().map_err(|e| {
                PipelineError::config(format!("Invalid IMEXPORT_MAX_CONCURRENT_TASKS: {}", e))
            })?;
        }
        if let Some(value) = env_var("TEMPLATE_URL_TTL") {
            config.runtime.template_url_ttl_secs = value.parse().map_err(|e| {
                PipelineError::config(format!("Invalid IMEXPORT_TEMPLATE_URL_TTL: {}", e))
            })?;
        }
        if let Some(storage_type) = env_var("STORAGE_TYPE") {
            config.file_storage.storage_type = storage_type;
        }
        if let Some(path) = env_var("STORAGE_PATH") {
            config.file_storage.local_path = Some(path);
        }
        if let Some(base_url) = env_var("PUBLIC_BASE_URL") {
            config.file_storage.public_base_url = base_url;
        }
        if let Some(secret) = env_var("SIGNING_SECRET") {
            config.file_storage.signing_secret = Some(secret);
        }
        if let Some(bucket) = env_var("S3_BUCKET") {
            config.file_storage.s3 = Some(S3Config {
                bucket,
                region: env_var("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                key_prefix: env_var("S3_KEY_PREFIX"),
                endpoint: env_var("S3_ENDPOINT"),
            });
        }
        if let Some(url) = env_var("DATABASE_URL") {
            config.task_store.backend = TaskStoreBackend::Database;
            config.task_store.database.url = url;
        }
        if let Some(level) = env_var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(json) = env_var("LOG_JSON") {
            config.logging.json = matches!(json.as_str(), "1" | "true" | "yes");
        }

        Ok(config)
    }

    /// Merge two configurations, with other taking precedence
    pub fn merge(mut self, other: Self) -> Self {
        self.runtime = self.runtime.merge(other.runtime);
        self.file_storage = self.file_storage.merge(other.file_storage);
        self.task_store = self.task_store.merge(other.task_store);
        self.logging = self.logging.merge(other.logging);
        self
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(format!("{}{}", ENV_PREFIX, name))
        .ok()
        .filter(|value| !value.trim().is_empty())
}
