//! Import runs: decode, classify every row, persist the valid batch, write
//! an error file for the rest

use super::{Pipeline, naming};
use crate::core::codec::{RecordBinding, TabularRecord, decode_records};
use crate::core::observer::RowOutcome;
use crate::core::provider::RowProcessor;
use crate::core::task::{NewTask, Task, TaskId, TaskSummary};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const IMPORT_SUCCEEDED: &str = "Import succeeded";
pub const IMPORT_WITH_ROW_ERRORS: &str = "Import completed with row errors";

/// A row that failed validation
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidRow<R> {
    /// 1-based data row index
    pub row_index: usize,
    pub message: String,
    pub record: R,
}

/// Rows partitioned by validation outcome, both in file order
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRows<R> {
    pub valid: Vec<R>,
    pub invalid: Vec<InvalidRow<R>>,
}

impl<R> ClassifiedRows<R> {
    pub fn total(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }
}

/// Summary of an import run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub task_id: TaskId,
    pub total_rows: u64,
    pub success_rows: u64,
    pub error_rows: u64,
    /// Present iff `error_rows > 0`
    pub error_file_ref: Option<String>,
    /// True iff no row failed validation
    pub success: bool,
    pub message: String,
}

/// Map a validator message to an outcome; `None` or blank passes
pub fn outcome_from_message(message: Option<String>, row_index: usize) -> RowOutcome {
    match message {
        Some(message) if !message.trim().is_empty() => RowOutcome::Invalid { row_index, message },
        _ => RowOutcome::Valid,
    }
}

/// Classify every record before anything is persisted
///
/// Row indexes start at 1 for the first data row. Each call of `validate`
/// sees only its own record.
pub fn classify_rows<R, F>(records: Vec<R>, mut validate: F) -> ClassifiedRows<R>
where
    F: FnMut(&R, usize) -> RowOutcome,
{
    let mut classified = ClassifiedRows {
        valid: Vec::with_capacity(records.len()),
        invalid: Vec::new(),
    };

    for (idx, record) in records.into_iter().enumerate() {
        let row_index = idx + 1;
        match validate(&record, row_index) {
            RowOutcome::Valid => classified.valid.push(record),
            RowOutcome::Invalid { message, .. } => classified.invalid.push(InvalidRow {
                row_index,
                message,
                record,
            }),
        }
    }

    classified
}

/// `["rowIndex", "errorMessage", ...headers]`
pub fn build_error_headers(headers: &[String]) -> Vec<String> {
    let mut error_headers = Vec::with_capacity(headers.len() + 2);
    error_headers.push("rowIndex".to_string());
    error_headers.push("errorMessage".to_string());
    error_headers.extend(headers.iter().cloned());
    error_headers
}

/// One row per invalid record: index, message, then the record's own cells
pub fn build_error_rows<R>(invalid: &[InvalidRow<R>], binding: &RecordBinding<R>) -> Vec<Vec<String>> {
    invalid
        .iter()
        .map(|row| {
            let mut cells = Vec::with_capacity(binding.len() + 2);
            cells.push(row.row_index.to_string());
            cells.push(row.message.clone());
            cells.extend(binding.to_cells(&row.record));
            cells
        })
        .collect()
}

impl Pipeline {
    /// Import a stored file through a row processor
    ///
    /// Row validation failures do not fail the run; they are counted and
    /// written to an error file.
    pub async fn import<R: TabularRecord>(
        &self,
        source_file_ref: &str,
        processor: &dyn RowProcessor<R>,
        created_by: Option<&str>,
    ) -> Result<ImportResult> {
        let task = self
            .start_import(source_file_ref, processor, created_by)
            .await?;
        self.complete_import(task.id, source_file_ref, processor).await
    }

    pub(super) async fn start_import<R: TabularRecord>(
        &self,
        source_file_ref: &str,
        processor: &dyn RowProcessor<R>,
        created_by: Option<&str>,
    ) -> Result<Task> {
        self.start_task(NewTask::import(
            processor.business_type(),
            source_file_ref,
            created_by.map(str::to_string),
        ))
        .await
    }

    pub(super) async fn complete_import<R: TabularRecord>(
        &self,
        task_id: TaskId,
        source_file_ref: &str,
        processor: &dyn RowProcessor<R>,
    ) -> Result<ImportResult> {
        self.run_tracked(task_id, async {
            let bytes = self.storage.get(source_file_ref).await?;

            let binding = R::binding();
            let headers = processor.headers();
            let records = decode_records(self.codec.as_ref(), &binding, &headers, &bytes)?;
            debug!(task_id, rows = records.len(), "Decoded import file");

            let classified = classify_rows(records, |record, row_index| {
                let message = processor.validate_row(record, row_index);
                let outcome = outcome_from_message(message, row_index);
                self.observer.on_row_classified(task_id, row_index, &outcome);
                outcome
            });

            let total_rows = classified.total() as u64;
            let success_rows = classified.valid.len() as u64;
            let error_rows = classified.invalid.len() as u64;

            if !classified.valid.is_empty() {
                processor.process_valid_rows(classified.valid).await?;
            }

            let error_file_ref = if classified.invalid.is_empty() {
                None
            } else {
                let error_headers = build_error_headers(&headers);
                let rows = build_error_rows(&classified.invalid, &binding);
                let bytes = self.codec.write_table(&error_headers, &rows)?;
                let name = naming::error_file_name(processor.business_type(), self.format());
                Some(self.store_artifact(Some(task_id), &bytes, &name).await?)
            };

            let success = error_rows == 0;
            info!(task_id, total_rows, success_rows, error_rows, "Import completed");

            let result = ImportResult {
                task_id,
                total_rows,
                success_rows,
                error_rows,
                error_file_ref: error_file_ref.clone(),
                success,
                message: if success {
                    IMPORT_SUCCEEDED.to_string()
                } else {
                    IMPORT_WITH_ROW_ERRORS.to_string()
                },
            };
            let summary = TaskSummary::Import {
                total_rows,
                success_rows,
                error_rows,
                error_file_ref,
            };
            Ok((result, summary))
        })
        .await
    }
}
