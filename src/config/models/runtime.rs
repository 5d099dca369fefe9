//! Pipeline runtime configuration

use super::{default_max_concurrent_tasks, default_template_url_ttl};
use crate::core::codec::FileFormat;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Runtime settings of the pipeline engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// File format used when a caller does not pick one
    #[serde(default)]
    pub default_format: FileFormat,
    /// Upper bound of async pipeline runs executing at the same time
    #[serde(default = "default_max_concurrent_tasks")]
    pub max_concurrent_tasks: usize,
    /// Lifetime of signed template download URLs in seconds
    #[serde(default = "default_template_url_ttl")]
    pub template_url_ttl_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_format: FileFormat::default(),
            max_concurrent_tasks: default_max_concurrent_tasks(),
            template_url_ttl_secs: default_template_url_ttl(),
        }
    }
}

impl RuntimeConfig {
    /// Template URL lifetime as a duration
    pub fn template_url_ttl(&self) -> Duration {
        Duration::from_secs(self.template_url_ttl_secs)
    }

    /// Merge runtime configurations (other takes precedence when non-default)
    pub fn merge(mut self, other: Self) -> Self {
        if other.default_format != FileFormat::default() {
            self.default_format = other.default_format;
        }
        if other.max_concurrent_tasks != default_max_concurrent_tasks() {
            self.max_concurrent_tasks = other.max_concurrent_tasks;
        }
        if other.template_url_ttl_secs != default_template_url_ttl() {
            self.template_url_ttl_secs = other.template_url_ttl_secs;
        }
        self
    }
}
