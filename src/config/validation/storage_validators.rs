//! Storage configuration validators
//!
//! Covers object storage for artifacts and the task record store.

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for FileStorageConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating file storage configuration");

        match self.storage_type.as_str() {
            "local" => {
                let path = self.local_path.as_deref().unwrap_or_default();
                if path.trim().is_empty() {
                    return Err("Local storage requires local_path".to_string());
                }
            }
            "memory" => {}
            "s3" => match &self.s3 {
                Some(s3) => s3.validate()?,
                None => return Err("S3 storage requires an s3 section".to_string()),
            },
            other => return Err(format!("Unsupported storage type: {}", other)),
        }

        if self.storage_type != "s3" {
            url::Url::parse(&self.public_base_url)
                .map_err(|e| format!("Invalid public_base_url: {}", e))?;
        }

        if let Some(secret) = &self.signing_secret {
            if secret.len() < 16 {
                return Err("Signing secret must be at least 16 characters".to_string());
            }
        }

        Ok(())
    }
}

impl Validate for S3Config {
    fn validate(&self) -> Result<(), String> {
        if self.bucket.trim().is_empty() {
            return Err("S3 bucket cannot be empty".to_string());
        }

        if self.region.trim().is_empty() {
            return Err("S3 region cannot be empty".to_string());
        }

        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err("S3 endpoint must start with http:// or https://".to_string());
            }
        }

        Ok(())
    }
}

impl Validate for TaskStoreConfig {
    fn validate(&self) -> Result<(), String> {
        match self.backend {
            TaskStoreBackend::Memory => Ok(()),
            TaskStoreBackend::Database => self.database.validate(),
        }
    }
}

impl Validate for DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }

        if !self.url.starts_with("sqlite:")
            && !self.url.starts_with("postgresql://")
            && !self.url.starts_with("postgres://")
        {
            return Err("Only SQLite and PostgreSQL databases are supported".to_string());
        }

        if self.max_connections == 0 {
            return Err("Database max connections must be greater than 0".to_string());
        }

        if self.max_connections > 1000 {
            return Err("Database max connections should not exceed 1000".to_string());
        }

        if self.connection_timeout == 0 {
            return Err("Database connection timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
