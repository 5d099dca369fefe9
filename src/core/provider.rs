//! Business-supplied capabilities
//!
//! A business type plugs into the pipeline by implementing one or more of
//! these roles for its record type. None of them knows about file formats.

use crate::core::codec::TabularRecord;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Supplies records for an export
#[async_trait]
pub trait ExportProvider<R: TabularRecord>: Send + Sync {
    /// Key of the business type
    fn business_type(&self) -> &str;

    /// Column headers, one per bound field
    fn headers(&self) -> Vec<String> {
        R::binding().headers()
    }

    /// Base name of the exported file
    fn export_file_name(&self) -> &str;

    /// Load the records to export
    async fn query_export_data(&self, params: &Value) -> Result<Vec<R>>;
}

/// Describes a blank import template
pub trait TemplateProvider<R: TabularRecord>: Send + Sync {
    fn business_type(&self) -> &str;

    fn headers(&self) -> Vec<String> {
        R::binding().headers()
    }

    /// Base name of the template file
    fn template_file_name(&self) -> &str;
}

/// Validates and persists imported records
#[async_trait]
pub trait RowProcessor<R: TabularRecord>: Send + Sync {
    fn business_type(&self) -> &str;

    fn headers(&self) -> Vec<String> {
        R::binding().headers()
    }

    /// Check one record. `None` or a blank message means the row passes.
    ///
    /// `row_index` is 1-based over data rows.
    fn validate_row(&self, record: &R, row_index: usize) -> Option<String>;

    /// Persist every row that passed validation, in one call
    async fn process_valid_rows(&self, records: Vec<R>) -> Result<()>;
}
