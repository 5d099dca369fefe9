//! Task lifecycle manager
//!
//! Every tracked run calls [`TaskLifecycle::create_task`] once and then exactly
//! one of [`TaskLifecycle::finalize_success`] / [`TaskLifecycle::finalize_failure`].
//! The store rejects a second finalization with `PipelineError::Conflict`.

use super::types::*;
use crate::storage::database::TaskStore;
use crate::utils::error::{PipelineError, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Creates and finalizes task records in a [`TaskStore`]
#[derive(Clone)]
pub struct TaskLifecycle {
    store: Arc<dyn TaskStore>,
}

impl TaskLifecycle {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Underlying task store
    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Insert a new task in PROCESSING state and return it with its id
    pub async fn create_task(&self, new_task: NewTask) -> Result<Task> {
        let now = Utc::now();
        let draft = TaskDraft {
            kind: new_task.kind,
            business_type: new_task.business_type,
            status: TaskStatus::Processing,
            created_by: new_task.created_by,
            query_params: new_task.query_params,
            source_file_ref: new_task.source_file_ref,
            created_at: now,
            updated_at: now,
        };

        let id = self.store.insert(&draft).await?;
        info!(
            task_id = id,
            kind = %draft.kind,
            business_type = %draft.business_type,
            "Task created"
        );
        Ok(draft.into_task(id))
    }

    /// Mark a task SUCCESS with its summary
    pub async fn finalize_success(&self, task_id: TaskId, summary: TaskSummary) -> Result<()> {
        debug!(task_id, ?summary, "Finalizing task as success");
        self.store
            .update_by_id(task_id, &TaskUpdate::success(summary))
            .await
    }

    /// Mark a task FAILED with an error message
    pub async fn finalize_failure(&self, task_id: TaskId, message: &str) -> Result<()> {
        let message = if message.trim().is_empty() {
            warn!(task_id, "Task failed without an error message");
            "Unknown error".to_string()
        } else {
            message.to_string()
        };
        debug!(task_id, error = %message, "Finalizing task as failed");
        self.store
            .update_by_id(task_id, &TaskUpdate::failure(message))
            .await
    }

    /// Load a task by id
    pub async fn get(&self, task_id: TaskId) -> Result<Task> {
        self.store
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| PipelineError::not_found(format!("Task {} not found", task_id)))
    }

    /// List tasks matching a filter, newest first
    pub async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        self.store.list(query).await
    }
}

impl std::fmt::Debug for TaskLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskLifecycle").finish_non_exhaustive()
    }
}
