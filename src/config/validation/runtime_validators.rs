//! Runtime and logging configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing_subscriber::EnvFilter;

impl Validate for RuntimeConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_tasks == 0 {
            return Err("Max concurrent tasks must be greater than 0".to_string());
        }

        if self.max_concurrent_tasks > 1024 {
            return Err("Max concurrent tasks should not exceed 1024".to_string());
        }

        if self.template_url_ttl_secs == 0 {
            return Err("Template URL TTL must be greater than 0".to_string());
        }

        // 7 days, the longest presign S3 accepts
        if self.template_url_ttl_secs > 604_800 {
            return Err("Template URL TTL should not exceed 7 days".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        EnvFilter::try_new(&self.level)
            .map(|_| ())
            .map_err(|e| format!("Invalid log filter '{}': {}", self.level, e))
    }
}
