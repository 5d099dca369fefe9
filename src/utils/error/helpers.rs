//! Helper functions for creating specific error types

use super::types::PipelineError;
use crate::core::task::TaskId;

/// Helper functions for creating specific errors
impl PipelineError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn codec<S: Into<String>>(message: S) -> Self {
        Self::Codec(message.into())
    }

    pub fn file_storage<S: Into<String>>(message: S) -> Self {
        Self::FileStorage(message.into())
    }

    pub fn query<S: Into<String>>(message: S) -> Self {
        Self::Query(message.into())
    }

    pub fn sink<S: Into<String>>(message: S) -> Self {
        Self::Sink(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn task_failed(task_id: TaskId, source: PipelineError) -> Self {
        Self::TaskFailed {
            task_id,
            source: Box::new(source),
        }
    }
}

impl PipelineError {
    /// Task id of a failed tracked run, if this error came from one
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            Self::TaskFailed { task_id, .. } => Some(*task_id),
            _ => None,
        }
    }

    /// The underlying cause, unwrapping `TaskFailed`
    pub fn root(&self) -> &PipelineError {
        match self {
            Self::TaskFailed { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the error is caused by an unavailable or misbehaving backend
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self.root(),
            Self::Database(_)
                | Self::Io(_)
                | Self::Codec(_)
                | Self::FileStorage(_)
                | Self::Query(_)
                | Self::Sink(_)
                | Self::Internal(_)
        )
    }
}
