//! Task data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::PipelineError;

/// Task identifier, assigned by the task store on insert
pub type TaskId = i64;

/// Task status
///
/// Transitions only go forward: `Pending -> Processing -> {Success, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Accepted but not started
    Pending,
    /// Pipeline is running
    Processing,
    /// Pipeline completed (possibly with row-level errors)
    Success,
    /// Pipeline could not run to completion
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Processing => "PROCESSING",
            TaskStatus::Success => "SUCCESS",
            TaskStatus::Failed => "FAILED",
        }
    }

    /// Terminal statuses never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Success | TaskStatus::Failed)
    }

    /// Whether `next` is a legal successor of this status
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        match (self, next) {
            (TaskStatus::Pending, TaskStatus::Processing) => true,
            (TaskStatus::Pending | TaskStatus::Processing, TaskStatus::Success)
            | (TaskStatus::Pending | TaskStatus::Processing, TaskStatus::Failed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(TaskStatus::Pending),
            "PROCESSING" => Ok(TaskStatus::Processing),
            "SUCCESS" => Ok(TaskStatus::Success),
            "FAILED" => Ok(TaskStatus::Failed),
            other => Err(PipelineError::validation(format!(
                "Unknown task status: {}",
                other
            ))),
        }
    }
}

/// Which pipeline a task tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Import,
    Export,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Import => "import",
            TaskKind::Export => "export",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "import" => Ok(TaskKind::Import),
            "export" => Ok(TaskKind::Export),
            other => Err(PipelineError::validation(format!(
                "Unknown task kind: {}",
                other
            ))),
        }
    }
}

/// A persisted task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub kind: TaskKind,
    pub business_type: String,
    pub status: TaskStatus,
    pub created_by: Option<String>,
    /// Serialized export query parameters
    pub query_params: Option<String>,
    /// Export artifact reference
    pub file_ref: Option<String>,
    /// Import source file reference
    pub source_file_ref: Option<String>,
    pub total_rows: Option<u64>,
    pub success_rows: Option<u64>,
    pub error_rows: Option<u64>,
    pub error_file_ref: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new task; the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub kind: TaskKind,
    pub business_type: String,
    pub status: TaskStatus,
    pub created_by: Option<String>,
    pub query_params: Option<String>,
    pub source_file_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskDraft {
    /// Materialize the draft as a task with the given id
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            kind: self.kind,
            business_type: self.business_type,
            status: self.status,
            created_by: self.created_by,
            query_params: self.query_params,
            file_ref: None,
            source_file_ref: self.source_file_ref,
            total_rows: None,
            success_rows: None,
            error_rows: None,
            error_file_ref: None,
            error_message: None,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// What a caller knows about a task before it exists
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub kind: TaskKind,
    pub business_type: String,
    pub created_by: Option<String>,
    pub query_params: Option<String>,
    pub source_file_ref: Option<String>,
}

impl NewTask {
    pub fn export(
        business_type: impl Into<String>,
        query_params: Option<String>,
        created_by: Option<String>,
    ) -> Self {
        Self {
            kind: TaskKind::Export,
            business_type: business_type.into(),
            created_by,
            query_params,
            source_file_ref: None,
        }
    }

    pub fn import(
        business_type: impl Into<String>,
        source_file_ref: impl Into<String>,
        created_by: Option<String>,
    ) -> Self {
        Self {
            kind: TaskKind::Import,
            business_type: business_type.into(),
            created_by,
            query_params: None,
            source_file_ref: Some(source_file_ref.into()),
        }
    }
}

/// Partial update; only `Some` fields are written
#[derive(Debug, Clone, PartialEq)]
pub struct TaskUpdate {
    pub status: TaskStatus,
    pub file_ref: Option<String>,
    pub total_rows: Option<u64>,
    pub success_rows: Option<u64>,
    pub error_rows: Option<u64>,
    pub error_file_ref: Option<String>,
    pub error_message: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TaskUpdate {
    fn with_status(status: TaskStatus) -> Self {
        Self {
            status,
            file_ref: None,
            total_rows: None,
            success_rows: None,
            error_rows: None,
            error_file_ref: None,
            error_message: None,
            updated_at: Utc::now(),
        }
    }

    /// Successful completion carrying the run summary
    pub fn success(summary: TaskSummary) -> Self {
        let mut update = Self::with_status(TaskStatus::Success);
        match summary {
            TaskSummary::Export {
                file_ref,
                total_rows,
            } => {
                update.file_ref = Some(file_ref);
                update.total_rows = Some(total_rows);
            }
            TaskSummary::Import {
                total_rows,
                success_rows,
                error_rows,
                error_file_ref,
            } => {
                update.total_rows = Some(total_rows);
                update.success_rows = Some(success_rows);
                update.error_rows = Some(error_rows);
                update.error_file_ref = error_file_ref;
            }
        }
        update
    }

    /// Pipeline failure with its message
    pub fn failure(message: impl Into<String>) -> Self {
        let mut update = Self::with_status(TaskStatus::Failed);
        update.error_message = Some(message.into());
        update
    }

    /// Apply the present fields onto a task
    pub fn apply_to(&self, task: &mut Task) {
        task.status = self.status;
        task.updated_at = self.updated_at;
        if let Some(file_ref) = &self.file_ref {
            task.file_ref = Some(file_ref.clone());
        }
        if let Some(total) = self.total_rows {
            task.total_rows = Some(total);
        }
        if let Some(success) = self.success_rows {
            task.success_rows = Some(success);
        }
        if let Some(errors) = self.error_rows {
            task.error_rows = Some(errors);
        }
        if let Some(error_file_ref) = &self.error_file_ref {
            task.error_file_ref = Some(error_file_ref.clone());
        }
        if let Some(message) = &self.error_message {
            task.error_message = Some(message.clone());
        }
    }
}

/// Summary fields written on successful completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSummary {
    Export {
        file_ref: String,
        total_rows: u64,
    },
    Import {
        total_rows: u64,
        success_rows: u64,
        error_rows: u64,
        error_file_ref: Option<String>,
    },
}

/// Task listing filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    pub kind: Option<TaskKind>,
    pub business_type: Option<String>,
    pub status: Option<TaskStatus>,
    /// Maximum number of tasks returned, newest first
    pub limit: Option<u64>,
}

impl TaskQuery {
    pub fn matches(&self, task: &Task) -> bool {
        self.kind.is_none_or(|kind| task.kind == kind)
            && self
                .business_type
                .as_deref()
                .is_none_or(|business_type| task.business_type == business_type)
            && self.status.is_none_or(|status| task.status == status)
    }
}
