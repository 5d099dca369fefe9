//! Export runs

use super::{Pipeline, naming};
use crate::core::codec::{TabularRecord, encode_records};
use crate::core::provider::ExportProvider;
use crate::core::task::{NewTask, Task, TaskId, TaskSummary};
use crate::utils::error::Result;
use serde_json::Value;
use tracing::{info, warn};

impl Pipeline {
    /// Export provider data to a stored file and return its reference
    pub async fn export<R: TabularRecord>(
        &self,
        provider: &dyn ExportProvider<R>,
        params: &Value,
        created_by: Option<&str>,
    ) -> Result<String> {
        let task = self.start_export(provider, params, created_by).await?;
        self.complete_export(task.id, provider, params).await
    }

    pub(super) async fn start_export<R: TabularRecord>(
        &self,
        provider: &dyn ExportProvider<R>,
        params: &Value,
        created_by: Option<&str>,
    ) -> Result<Task> {
        self.start_task(NewTask::export(
            provider.business_type(),
            Some(params.to_string()),
            created_by.map(str::to_string),
        ))
        .await
    }

    pub(super) async fn complete_export<R: TabularRecord>(
        &self,
        task_id: TaskId,
        provider: &dyn ExportProvider<R>,
        params: &Value,
    ) -> Result<String> {
        self.run_tracked(task_id, async {
            let records = provider.query_export_data(params).await?;
            if records.is_empty() {
                warn!(
                    task_id,
                    business_type = provider.business_type(),
                    "Export query returned no rows, writing headers only"
                );
            }

            let headers = provider.headers();
            let bytes = encode_records(self.codec.as_ref(), &R::binding(), &headers, &records)?;

            let name = naming::timestamped_name(provider.export_file_name(), self.format());
            let file_ref = self.store_artifact(Some(task_id), &bytes, &name).await?;

            info!(task_id, rows = records.len(), file_ref = %file_ref, "Export completed");
            let summary = TaskSummary::Export {
                file_ref: file_ref.clone(),
                total_rows: records.len() as u64,
            };
            Ok((file_ref, summary))
        })
        .await
    }
}
