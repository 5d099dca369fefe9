use crate::core::task::{
    Task, TaskDraft, TaskId, TaskKind, TaskQuery, TaskStatus, TaskUpdate,
};
use crate::storage::database::TaskStore;
use crate::utils::error::{PipelineError, Result};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;
use tracing::debug;

use super::super::entities::{self, pipeline_task};
use super::types::SeaOrmDatabase;

const ALL_STATUSES: [TaskStatus; 4] = [
    TaskStatus::Pending,
    TaskStatus::Processing,
    TaskStatus::Success,
    TaskStatus::Failed,
];

fn to_db_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn from_db_count(value: Option<i64>) -> Option<u64> {
    value.map(|v| u64::try_from(v).unwrap_or(0))
}

impl TryFrom<pipeline_task::Model> for Task {
    type Error = PipelineError;

    fn try_from(model: pipeline_task::Model) -> Result<Self> {
        Ok(Task {
            id: model.id,
            kind: model.kind.parse::<TaskKind>()?,
            business_type: model.business_type,
            status: model.status.parse::<TaskStatus>()?,
            created_by: model.created_by,
            query_params: model.query_params,
            file_ref: model.file_ref,
            source_file_ref: model.source_file_ref,
            total_rows: from_db_count(model.total_rows),
            success_rows: from_db_count(model.success_rows),
            error_rows: from_db_count(model.error_rows),
            error_file_ref: model.error_file_ref,
            error_message: model.error_message,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl TaskStore for SeaOrmDatabase {
    async fn insert(&self, draft: &TaskDraft) -> Result<TaskId> {
        debug!("Creating {} task for {}", draft.kind, draft.business_type);

        let active_model = pipeline_task::ActiveModel {
            id: NotSet,
            kind: Set(draft.kind.as_str().to_string()),
            business_type: Set(draft.business_type.clone()),
            status: Set(draft.status.as_str().to_string()),
            created_by: Set(draft.created_by.clone()),
            query_params: Set(draft.query_params.clone()),
            file_ref: Set(None),
            source_file_ref: Set(draft.source_file_ref.clone()),
            total_rows: Set(None),
            success_rows: Set(None),
            error_rows: Set(None),
            error_file_ref: Set(None),
            error_message: Set(None),
            created_at: Set(draft.created_at.into()),
            updated_at: Set(draft.updated_at.into()),
        };

        let result = entities::PipelineTask::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(PipelineError::Database)?;

        Ok(result.last_insert_id)
    }

    async fn update_by_id(&self, id: TaskId, update: &TaskUpdate) -> Result<()> {
        debug!("Updating task {} -> {}", id, update.status);

        let mut active_model = pipeline_task::ActiveModel {
            status: Set(update.status.as_str().to_string()),
            updated_at: Set(update.updated_at.into()),
            ..Default::default()
        };
        if let Some(file_ref) = &update.file_ref {
            active_model.file_ref = Set(Some(file_ref.clone()));
        }
        if let Some(total) = update.total_rows {
            active_model.total_rows = Set(Some(to_db_count(total)));
        }
        if let Some(success) = update.success_rows {
            active_model.success_rows = Set(Some(to_db_count(success)));
        }
        if let Some(errors) = update.error_rows {
            active_model.error_rows = Set(Some(to_db_count(errors)));
        }
        if let Some(error_file_ref) = &update.error_file_ref {
            active_model.error_file_ref = Set(Some(error_file_ref.clone()));
        }
        if let Some(message) = &update.error_message {
            active_model.error_message = Set(Some(message.clone()));
        }

        // Only rows whose current status may move to the new one are touched
        let allowed: Vec<&str> = ALL_STATUSES
            .iter()
            .filter(|status| status.can_transition_to(update.status))
            .map(|status| status.as_str())
            .collect();

        let result = entities::PipelineTask::update_many()
            .set(active_model)
            .filter(pipeline_task::Column::Id.eq(id))
            .filter(pipeline_task::Column::Status.is_in(allowed))
            .exec(&self.db)
            .await
            .map_err(PipelineError::Database)?;

        if result.rows_affected == 0 {
            return match self.find_by_id(id).await? {
                None => Err(PipelineError::not_found(format!("Task {} not found", id))),
                Some(task) => Err(PipelineError::conflict(format!(
                    "Task {} is already {}, cannot move to {}",
                    id, task.status, update.status
                ))),
            };
        }

        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>> {
        entities::PipelineTask::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(PipelineError::Database)?
            .map(Task::try_from)
            .transpose()
    }

    async fn list(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        let mut select = entities::PipelineTask::find();
        if let Some(kind) = query.kind {
            select = select.filter(pipeline_task::Column::Kind.eq(kind.as_str()));
        }
        if let Some(business_type) = &query.business_type {
            select = select.filter(pipeline_task::Column::BusinessType.eq(business_type.as_str()));
        }
        if let Some(status) = query.status {
            select = select.filter(pipeline_task::Column::Status.eq(status.as_str()));
        }
        if let Some(limit) = query.limit {
            select = select.limit(limit);
        }

        select
            .order_by_desc(pipeline_task::Column::Id)
            .all(&self.db)
            .await
            .map_err(PipelineError::Database)?
            .into_iter()
            .map(Task::try_from)
            .collect()
    }
}
