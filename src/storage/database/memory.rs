//! In-memory task store

use super::store::TaskStore;
use crate::core::task::{Task, TaskDraft, TaskId, TaskQuery, TaskUpdate};
use crate::utils::error::{PipelineError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::debug;

/// Task store backed by an ordered map; ids start at 1
#[derive(Debug)]
pub struct InMemoryTaskStore {
    tasks: RwLock<BTreeMap<TaskId, Task>>,
    next_id: AtomicI64,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, draft: &TaskDraft) -> Result<TaskId> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.tasks.write().insert(id, draft.clone().into_task(id));
        debug!(task_id = id, "Task inserted");
        Ok(id)
    }

    async fn update_by_id(&self, id: TaskId, update: &TaskUpdate) -> Result<()> {
        let mut tasks = self.tasks.write();
        let task = tasks
            .get_mut(&id)
            .ok_or_else(|| PipelineError::not_found(format!("Task {} not found", id)))?;

        if !task.status.can_transition_to(update.status) {
            return Err(PipelineError::conflict(format!(
                "Task {} is already {}, cannot move to {}",
                id, task.status, update.status
            )));
        }

        update.apply_to(task);
        debug!(task_id = id, status = %update.status, "Task updated");
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.tasks.read().get(&id).cloned())
    }

    async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        let tasks = self.tasks.read();
        let matching = tasks.values().rev().filter(|task| query.matches(task)).cloned();
        Ok(match query.limit {
            Some(limit) => matching.take(limit as usize).collect(),
            None => matching.collect(),
        })
    }
}
