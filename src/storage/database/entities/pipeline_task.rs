use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Pipeline task database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "pipeline_tasks")]
pub struct Model {
    /// Task ID
    #[sea_orm(primary_key)]
    pub id: i64,

    /// "import" or "export"
    pub kind: String,

    /// Business type key
    pub business_type: String,

    /// PENDING, PROCESSING, SUCCESS or FAILED
    pub status: String,

    pub created_by: Option<String>,

    /// Serialized export query parameters
    #[sea_orm(column_type = "Text", nullable)]
    pub query_params: Option<String>,

    /// Export artifact reference
    pub file_ref: Option<String>,

    /// Import source file reference
    pub source_file_ref: Option<String>,

    pub total_rows: Option<i64>,
    pub success_rows: Option<i64>,
    pub error_rows: Option<i64>,

    /// Import error artifact reference
    pub error_file_ref: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Pipeline task entity relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
