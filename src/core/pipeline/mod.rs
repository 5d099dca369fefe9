//! Pipeline core
//!
//! Drives export, import and template runs: creates the task, calls the
//! codec, the storage and the business roles, and finalizes the task exactly
//! once whatever happens in between.

mod export;
mod import;
pub mod naming;
mod template;
mod worker;

pub use import::{
    ClassifiedRows, ImportResult, InvalidRow, build_error_headers, build_error_rows,
    classify_rows, outcome_from_message,
};
pub use worker::TaskHandle;

use crate::config::Config;
use crate::core::codec::{FileFormat, TabularCodec, codec_for};
use crate::core::observer::{PipelineObserver, TracingObserver};
use crate::core::task::{NewTask, Task, TaskId, TaskLifecycle, TaskStatus, TaskSummary};
use crate::storage::database::{TaskStore, connect_task_store};
use crate::storage::files::{FileStorage, ObjectStorage};
use crate::utils::error::{PipelineError, Result};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::error;

/// Clonable handle to the pipeline engine
#[derive(Clone)]
pub struct Pipeline {
    codec: Arc<dyn TabularCodec>,
    storage: Arc<dyn ObjectStorage>,
    tasks: TaskLifecycle,
    observer: Arc<dyn PipelineObserver>,
    workers: Arc<Semaphore>,
}

impl Pipeline {
    pub fn new(
        codec: Arc<dyn TabularCodec>,
        storage: Arc<dyn ObjectStorage>,
        store: Arc<dyn TaskStore>,
    ) -> Self {
        Self {
            codec,
            storage,
            tasks: TaskLifecycle::new(store),
            observer: Arc::new(TracingObserver),
            workers: Arc::new(Semaphore::new(crate::config::default_max_concurrent_tasks())),
        }
    }

    /// Build storage, task store and codec from configuration
    pub async fn from_config(config: &Config) -> Result<Self> {
        let storage = FileStorage::new(config.file_storage()).await?;
        let store = connect_task_store(config.task_store()).await?;
        let runtime = config.runtime();

        Ok(Self::new(codec_for(runtime.default_format), Arc::new(storage), store)
            .with_max_concurrent_tasks(runtime.max_concurrent_tasks))
    }

    /// Same pipeline writing and reading another format
    pub fn with_codec(&self, codec: Arc<dyn TabularCodec>) -> Self {
        Self {
            codec,
            ..self.clone()
        }
    }

    pub fn with_format(&self, format: FileFormat) -> Self {
        self.with_codec(codec_for(format))
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Bound on async runs executing at once
    pub fn with_max_concurrent_tasks(mut self, max: usize) -> Self {
        self.workers = Arc::new(Semaphore::new(max.max(1)));
        self
    }

    pub fn format(&self) -> FileFormat {
        self.codec.format()
    }

    pub fn tasks(&self) -> &TaskLifecycle {
        &self.tasks
    }

    pub fn storage(&self) -> &Arc<dyn ObjectStorage> {
        &self.storage
    }

    async fn start_task(&self, new_task: NewTask) -> Result<Task> {
        let task = self.tasks.create_task(new_task).await?;
        self.observer.on_task_created(&task);
        Ok(task)
    }

    async fn store_artifact(
        &self,
        task_id: Option<TaskId>,
        bytes: &[u8],
        name: &str,
    ) -> Result<String> {
        let file_ref = self
            .storage
            .put(bytes, name, self.codec.format().content_type())
            .await?;
        self.observer.on_artifact_stored(task_id, &file_ref, name);
        Ok(file_ref)
    }

    /// Run a task body and finalize the task with its outcome
    ///
    /// Errors and panics in `body` end as FAILED and come back wrapped in
    /// `PipelineError::TaskFailed`.
    async fn run_tracked<T, F>(&self, task_id: TaskId, body: F) -> Result<T>
    where
        F: Future<Output = Result<(T, TaskSummary)>> + Send,
    {
        let outcome = match AssertUnwindSafe(body).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => Err(PipelineError::internal(format!(
                "Pipeline panicked: {}",
                panic_message(panic.as_ref())
            ))),
        };

        match outcome {
            Ok((value, summary)) => match self.tasks.finalize_success(task_id, summary).await {
                Ok(()) => {
                    self.observer
                        .on_task_finalized(task_id, TaskStatus::Success, None);
                    Ok(value)
                }
                Err(e) => {
                    self.record_failure(task_id, &e).await;
                    Err(PipelineError::task_failed(task_id, e))
                }
            },
            Err(e) => {
                self.record_failure(task_id, &e).await;
                Err(PipelineError::task_failed(task_id, e))
            }
        }
    }

    async fn record_failure(&self, task_id: TaskId, cause: &PipelineError) {
        let message = cause.to_string();
        match self.tasks.finalize_failure(task_id, &message).await {
            Ok(()) => self
                .observer
                .on_task_finalized(task_id, TaskStatus::Failed, Some(&message)),
            Err(e) => {
                error!(task_id, error = %e, cause = %message, "Failed to record task failure");
                self.observer.on_finalize_failed(task_id, &message, &e);
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("format", &self.codec.format())
            .field("available_workers", &self.workers.available_permits())
            .finish_non_exhaustive()
    }
}
