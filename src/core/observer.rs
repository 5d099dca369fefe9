//! Pipeline lifecycle hooks
//!
//! The pipeline reports what it does through a [`PipelineObserver`] instead
//! of global state, so embedders can route events to metrics or audit logs.

use crate::core::task::{Task, TaskId, TaskStatus};
use crate::utils::error::PipelineError;
use tracing::{debug, error, info};

/// Classification of one imported row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Valid,
    Invalid { row_index: usize, message: String },
}

impl RowOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, RowOutcome::Valid)
    }
}

/// Hooks called at fixed points of a pipeline run; all default to no-ops
pub trait PipelineObserver: Send + Sync {
    fn on_task_created(&self, _task: &Task) {}

    fn on_row_classified(&self, _task_id: TaskId, _row_index: usize, _outcome: &RowOutcome) {}

    fn on_artifact_stored(&self, _task_id: Option<TaskId>, _file_ref: &str, _file_name: &str) {}

    fn on_task_finalized(&self, _task_id: TaskId, _status: TaskStatus, _error: Option<&str>) {}

    /// The FAILED write itself failed; the stored task keeps its last status
    fn on_finalize_failed(&self, _task_id: TaskId, _cause: &str, _error: &PipelineError) {}
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Emits events as structured tracing records
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_task_created(&self, task: &Task) {
        info!(
            task_id = task.id,
            kind = %task.kind,
            business_type = %task.business_type,
            "Pipeline task started"
        );
    }

    fn on_row_classified(&self, task_id: TaskId, row_index: usize, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Valid => debug!(task_id, row_index, "Row valid"),
            RowOutcome::Invalid { message, .. } => {
                debug!(task_id, row_index, error = %message, "Row invalid")
            }
        }
    }

    fn on_artifact_stored(&self, task_id: Option<TaskId>, file_ref: &str, file_name: &str) {
        info!(?task_id, file_ref, file_name, "Artifact stored");
    }

    fn on_task_finalized(&self, task_id: TaskId, status: TaskStatus, error: Option<&str>) {
        match error {
            Some(message) => error!(task_id, %status, error = message, "Pipeline task failed"),
            None => info!(task_id, %status, "Pipeline task finished"),
        }
    }

    fn on_finalize_failed(&self, task_id: TaskId, cause: &str, error: &PipelineError) {
        error!(task_id, %error, cause, "Pipeline task could not be marked failed");
    }
}
