//! Configuration management for the import/export service
//!
//! Configuration is loaded from a YAML file, from `IMEXPORT_*` environment
//! variables, or both (environment wins).

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{PipelineError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Service configuration
    pub imexport: ServiceConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PipelineError::Config(format!("Failed to read config file: {}", e)))?;

        let imexport: ServiceConfig = serde_yaml::from_str(&content)
            .map_err(|e| PipelineError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self { imexport };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let imexport = ServiceConfig::from_env()?;
        let config = Self { imexport };

        config.validate()?;
        Ok(config)
    }

    /// Load from an optional file and overlay the environment
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path).await?,
            None => Self::default(),
        };
        let env = Self {
            imexport: ServiceConfig::from_env()?,
        };
        let config = base.merge(env);
        config.validate()?;
        Ok(config)
    }

    /// Get runtime configuration
    pub fn runtime(&self) -> &RuntimeConfig {
        &self.imexport.runtime
    }

    /// Get file storage configuration
    pub fn file_storage(&self) -> &FileStorageConfig {
        &self.imexport.file_storage
    }

    /// Get task store configuration
    pub fn task_store(&self) -> &TaskStoreConfig {
        &self.imexport.task_store
    }

    /// Get logging configuration
    pub fn logging(&self) -> &LoggingConfig {
        &self.imexport.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.imexport
            .runtime
            .validate()
            .map_err(|e| PipelineError::Config(format!("Runtime config error: {}", e)))?;

        self.imexport
            .file_storage
            .validate()
            .map_err(|e| PipelineError::Config(format!("File storage config error: {}", e)))?;

        self.imexport
            .task_store
            .validate()
            .map_err(|e| PipelineError::Config(format!("Task store config error: {}", e)))?;

        self.imexport
            .logging
            .validate()
            .map_err(|e| PipelineError::Config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Merge with another configuration (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        self.imexport = self.imexport.merge(other.imexport);
        self
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.imexport)
            .map_err(|e| PipelineError::Config(format!("Failed to serialize config to JSON: {}", e)))
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.imexport)
            .map_err(|e| PipelineError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
