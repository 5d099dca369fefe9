//! Asynchronous submission
//!
//! The task is created before `submit_*` returns; the rest of the run goes
//! to a tokio task once a worker permit is free. Callers poll the task store
//! or wait on the handle.

use super::{ImportResult, Pipeline};
use crate::core::codec::TabularRecord;
use crate::core::provider::{ExportProvider, RowProcessor};
use crate::core::task::TaskId;
use crate::utils::error::{PipelineError, Result};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::OwnedSemaphorePermit;
use tokio::task::JoinHandle;
use tracing::debug;

/// A submitted run
#[derive(Debug)]
pub struct TaskHandle<T> {
    task_id: TaskId,
    join: JoinHandle<Result<T>>,
}

impl<T> TaskHandle<T> {
    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the run to finish
    pub async fn wait(self) -> Result<T> {
        self.join
            .await
            .map_err(|e| PipelineError::internal(format!("Worker for task {} died: {}", self.task_id, e)))?
    }
}

impl Pipeline {
    /// Submit an export; returns once the task exists
    pub async fn submit_export<R: TabularRecord>(
        &self,
        provider: Arc<dyn ExportProvider<R>>,
        params: Value,
        created_by: Option<String>,
    ) -> Result<TaskHandle<String>> {
        let task = self
            .start_export(provider.as_ref(), &params, created_by.as_deref())
            .await?;
        let task_id = task.id;
        let pipeline = self.clone();

        let join = tokio::spawn(async move {
            let _permit = pipeline.acquire_worker(task_id).await?;
            pipeline
                .complete_export(task_id, provider.as_ref(), &params)
                .await
        });

        Ok(TaskHandle { task_id, join })
    }

    /// Submit an import; returns once the task exists
    pub async fn submit_import<R: TabularRecord>(
        &self,
        source_file_ref: String,
        processor: Arc<dyn RowProcessor<R>>,
        created_by: Option<String>,
    ) -> Result<TaskHandle<ImportResult>> {
        let task = self
            .start_import(&source_file_ref, processor.as_ref(), created_by.as_deref())
            .await?;
        let task_id = task.id;
        let pipeline = self.clone();

        let join = tokio::spawn(async move {
            let _permit = pipeline.acquire_worker(task_id).await?;
            pipeline
                .complete_import(task_id, &source_file_ref, processor.as_ref())
                .await
        });

        Ok(TaskHandle { task_id, join })
    }

    async fn acquire_worker(&self, task_id: TaskId) -> Result<OwnedSemaphorePermit> {
        debug!(task_id, available = self.workers.available_permits(), "Waiting for worker");
        match self.workers.clone().acquire_owned().await {
            Ok(permit) => Ok(permit),
            Err(e) => {
                let cause = PipelineError::internal(format!("Worker pool closed: {}", e));
                self.record_failure(task_id, &cause).await;
                Err(PipelineError::task_failed(task_id, cause))
            }
        }
    }
}
