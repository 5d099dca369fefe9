//! Logging setup
//!
//! Installs the global `tracing` subscriber used by the binary. Library code only
//! emits events; it never installs a subscriber itself.

use crate::config::LoggingConfig;
use crate::utils::error::{PipelineError, Result};
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber from configuration
///
/// `RUST_LOG` takes precedence over the configured level when it is set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| PipelineError::config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .with_thread_ids(false);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| PipelineError::internal(format!("Failed to install subscriber: {}", e)))
}
