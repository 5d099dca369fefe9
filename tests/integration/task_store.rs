//! Task persistence integration tests
//!
//! Runs pipelines against a real in-memory SQLite database.

#[cfg(test)]
mod tests {
    use crate::common::TestEnv;
    use crate::common::fixtures::{ProductCatalog, ProductRecord, product_csv, user_csv};
    use imexport_rs::business::users::{USER_IMPORT, UserDirectory, UserRecord};
    use imexport_rs::config::{DatabaseConfig, TaskStoreBackend, TaskStoreConfig};
    use imexport_rs::core::task::{TaskQuery, TaskSummary};
    use imexport_rs::storage::database::{SeaOrmDatabase, connect_task_store};
    use imexport_rs::{PipelineError, TaskKind, TaskStatus};

    #[tokio::test]
    async fn test_sqlite_import_records_counts() {
        let env = TestEnv::sqlite().await;
        let directory = UserDirectory::new();
        let source = env.upload_csv("users.csv", &user_csv(10, &[3, 7])).await;

        let result = env
            .pipeline
            .import::<UserRecord>(&source, &directory, Some("carol"))
            .await
            .unwrap();

        let task = env.pipeline.tasks().get(result.task_id).await.unwrap();
        assert_eq!(task.status, TaskStatus::Success);
        assert_eq!(task.kind, TaskKind::Import);
        assert_eq!(task.business_type, USER_IMPORT);
        assert_eq!(task.total_rows, Some(10));
        assert_eq!(task.success_rows, Some(8));
        assert_eq!(task.error_rows, Some(2));
        assert_eq!(task.error_file_ref, result.error_file_ref);
        assert!(task.updated_at >= task.created_at);
    }

    #[tokio::test]
    async fn test_sqlite_failed_task_keeps_message() {
        let env = TestEnv::sqlite().await;
        let catalog = ProductCatalog::failing_sink();
        let source = env.upload_csv("products.csv", &product_csv(1, &[])).await;

        let err = env
            .pipeline
            .import::<ProductRecord>(&source, &catalog, None)
            .await
            .unwrap_err();

        let task = env.pipeline.tasks().get(err.task_id().unwrap()).await.unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(
            task.error_message.as_deref(),
            Some("Sink error: catalog is read-only")
        );
    }

    #[tokio::test]
    async fn test_terminal_tasks_cannot_be_finalized_again() {
        let env = TestEnv::sqlite().await;
        let directory = UserDirectory::new();
        let source = env.upload_csv("users.csv", &user_csv(1, &[])).await;

        let result = env
            .pipeline
            .import::<UserRecord>(&source, &directory, None)
            .await
            .unwrap();

        let tasks = env.pipeline.tasks();
        let err = tasks
            .finalize_failure(result.task_id, "late failure")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Conflict(_)));

        let err = tasks
            .finalize_success(
                result.task_id,
                TaskSummary::Export {
                    file_ref: "x".to_string(),
                    total_rows: 1,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Conflict(_)));

        let task = tasks.get(result.task_id).await.unwrap();
        assert_eq!(task.status, TaskStatus::Success);
        assert!(task.error_message.is_none());
    }

    #[tokio::test]
    async fn test_list_filters_newest_first() {
        let env = TestEnv::sqlite().await;
        let directory = UserDirectory::new();
        let catalog = ProductCatalog::default();

        let first = env.upload_csv("a.csv", &user_csv(2, &[])).await;
        let second = env.upload_csv("b.csv", &product_csv(2, &[])).await;
        let third = env.upload_csv("c.csv", &user_csv(1, &[])).await;

        let a = env
            .pipeline
            .import::<UserRecord>(&first, &directory, None)
            .await
            .unwrap();
        env.pipeline
            .import::<ProductRecord>(&second, &catalog, None)
            .await
            .unwrap();
        // user1 is already in the directory, the sink rejects the batch
        let failed = env
            .pipeline
            .import::<UserRecord>(&third, &directory, None)
            .await
            .unwrap_err();

        let tasks = env.pipeline.tasks();
        let all = tasks.list(&TaskQuery::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].id > w[1].id));

        let users = tasks
            .list(&TaskQuery {
                business_type: Some(USER_IMPORT.to_string()),
                ..TaskQuery::default()
            })
            .await
            .unwrap();
        let ids: Vec<_> = users.iter().map(|t| t.id).collect();
        assert_eq!(ids, [failed.task_id().unwrap(), a.task_id]);

        let failures = tasks
            .list(&TaskQuery {
                status: Some(TaskStatus::Failed),
                ..TaskQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(failures.len(), 1);

        let limited = tasks
            .list(&TaskQuery {
                kind: Some(TaskKind::Import),
                limit: Some(1),
                ..TaskQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, failed.task_id().unwrap());
    }

    #[tokio::test]
    async fn test_missing_task_is_not_found() {
        let env = TestEnv::sqlite().await;
        let err = env.pipeline.tasks().get(404).await.unwrap_err();
        assert!(matches!(err, PipelineError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_connect_database_backend() {
        let config = TaskStoreConfig {
            backend: TaskStoreBackend::Database,
            database: DatabaseConfig::sqlite_memory(),
        };
        let store = connect_task_store(&config).await.unwrap();
        let tasks = store.list(&TaskQuery::default()).await.unwrap();
        assert!(tasks.is_empty());

        let database = SeaOrmDatabase::new(&DatabaseConfig::sqlite_memory())
            .await
            .unwrap();
        database.health_check().await.unwrap();
    }
}
