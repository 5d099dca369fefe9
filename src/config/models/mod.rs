//! Configuration data models
//!
//! This module defines all configuration structures used by the pipeline service.

#![allow(missing_docs)]

pub mod file_storage;
pub mod logging;
pub mod runtime;
pub mod service;
pub mod storage;

// Re-export all configuration types
pub use file_storage::*;
pub use logging::*;
pub use runtime::*;
pub use service::*;
pub use storage::*;

/// Default maximum number of concurrently running async pipeline tasks
pub fn default_max_concurrent_tasks() -> usize {
    num_cpus::get().max(1)
}

/// Default lifetime of signed template download URLs in seconds
pub fn default_template_url_ttl() -> u64 {
    3600 // 1 hour
}

/// Default database connection pool size
pub fn default_max_connections() -> u32 {
    10
}

/// Default connection timeout in seconds
pub fn default_connection_timeout() -> u64 {
    5
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_local_path() -> String {
    "./data/files".to_string()
}

pub fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}
