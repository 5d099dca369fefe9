use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PipelineTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PipelineTasks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PipelineTasks::Kind).string().not_null())
                    .col(
                        ColumnDef::new(PipelineTasks::BusinessType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PipelineTasks::Status)
                            .string()
                            .not_null()
                            .default("PROCESSING"),
                    )
                    .col(ColumnDef::new(PipelineTasks::CreatedBy).string().null())
                    .col(ColumnDef::new(PipelineTasks::QueryParams).text().null())
                    .col(ColumnDef::new(PipelineTasks::FileRef).string().null())
                    .col(ColumnDef::new(PipelineTasks::SourceFileRef).string().null())
                    .col(ColumnDef::new(PipelineTasks::TotalRows).big_integer().null())
                    .col(ColumnDef::new(PipelineTasks::SuccessRows).big_integer().null())
                    .col(ColumnDef::new(PipelineTasks::ErrorRows).big_integer().null())
                    .col(ColumnDef::new(PipelineTasks::ErrorFileRef).string().null())
                    .col(ColumnDef::new(PipelineTasks::ErrorMessage).text().null())
                    .col(
                        ColumnDef::new(PipelineTasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PipelineTasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pipeline_tasks_business_type")
                    .table(PipelineTasks::Table)
                    .col(PipelineTasks::BusinessType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pipeline_tasks_status")
                    .table(PipelineTasks::Table)
                    .col(PipelineTasks::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PipelineTasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PipelineTasks {
    Table,
    Id,
    Kind,
    BusinessType,
    Status,
    CreatedBy,
    QueryParams,
    FileRef,
    SourceFileRef,
    TotalRows,
    SuccessRows,
    ErrorRows,
    ErrorFileRef,
    ErrorMessage,
    CreatedAt,
    UpdatedAt,
}
