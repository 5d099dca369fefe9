//! Error types for the pipeline

use crate::core::task::TaskId;
use thiserror::Error;

/// Result type alias for the pipeline
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding of a tabular file failed
    #[error("Codec error: {0}")]
    Codec(String),

    /// File storage errors
    #[error("File storage error: {0}")]
    FileStorage(String),

    /// Export data query failed
    #[error("Query error: {0}")]
    Query(String),

    /// Record sink rejected a batch
    #[error("Sink error: {0}")]
    Sink(String),

    /// Validation errors for configuration or caller input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict errors, e.g. finalizing a task that is already terminal
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// A tracked pipeline run failed and its task was marked FAILED
    #[error("Task {task_id} failed: {source}")]
    TaskFailed {
        task_id: TaskId,
        #[source]
        source: Box<PipelineError>,
    },
}
