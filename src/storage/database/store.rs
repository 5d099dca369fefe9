//! Task store capability

use crate::core::task::{Task, TaskDraft, TaskId, TaskQuery, TaskUpdate};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Persistence for task records
///
/// One call is one atomic write; callers never need a transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a task and return its assigned id
    async fn insert(&self, draft: &TaskDraft) -> Result<TaskId>;

    /// Apply a partial update
    ///
    /// Fails with `NotFound` for an unknown id and with `Conflict` when the
    /// task's current status cannot move to `update.status`.
    async fn update_by_id(&self, id: TaskId, update: &TaskUpdate) -> Result<()>;

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>>;

    /// Tasks matching the query, newest first
    async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>>;
}
