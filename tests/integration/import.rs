//! Import pipeline integration tests

#[cfg(test)]
mod tests {
    use crate::common::TestEnv;
    use crate::common::fixtures::{ProductCatalog, ProductRecord, product_csv, user_csv};
    use async_trait::async_trait;
    use imexport_rs::business::users::{USER_IMPORT, UserDirectory, UserRecord};
    use imexport_rs::core::codec::FileFormat;
    use imexport_rs::storage::database::InMemoryTaskStore;
    use imexport_rs::storage::files::ObjectStorage;
    use imexport_rs::{Pipeline, PipelineError, Result, TaskKind, TaskStatus};
    use mockall::mock;
    use std::sync::Arc;
    use std::time::Duration;

    mock! {
        pub Storage {}

        #[async_trait]
        impl ObjectStorage for Storage {
            async fn put(&self, content: &[u8], name: &str, content_type: &str) -> Result<String>;
            async fn get(&self, file_ref: &str) -> Result<Vec<u8>>;
            async fn sign(&self, file_ref: &str, ttl: Duration) -> Result<String>;
        }
    }

    /// Ten users, rows 3 and 7 with a malformed email
    #[tokio::test]
    async fn test_import_with_row_errors() {
        let env = TestEnv::memory();
        let directory = UserDirectory::new();
        let source = env.upload_csv("users.csv", &user_csv(10, &[3, 7])).await;

        let result = env
            .pipeline
            .import::<UserRecord>(&source, &directory, Some("alice"))
            .await
            .unwrap();

        assert_eq!(result.total_rows, 10);
        assert_eq!(result.success_rows, 8);
        assert_eq!(result.error_rows, 2);
        assert!(!result.success);
        assert_eq!(result.message, "Import completed with row errors");

        let imported: Vec<String> = directory.users().into_iter().map(|u| u.username).collect();
        assert_eq!(
            imported,
            ["user1", "user2", "user4", "user5", "user6", "user8", "user9", "user10"]
        );

        let error_ref = result.error_file_ref.clone().unwrap();
        let rows = env.read_csv(&error_ref).await;
        assert_eq!(
            rows[0],
            ["rowIndex", "errorMessage", "Username", "Email", "Phone", "Age", "Department"]
        );
        assert_eq!(
            rows[1],
            ["3", "Email format is invalid", "user3", "not-an-email", "", "30", "QA"]
        );
        assert_eq!(rows[2][0], "7");
        assert_eq!(rows[2][1], "Email format is invalid");
        assert_eq!(rows.len(), 3);

        let name = env.storage.metadata(&error_ref).unwrap().filename;
        assert!(name.starts_with("error_USER_IMPORT_"), "{}", name);
        assert!(name.ends_with(".csv"));

        let task = env.pipeline.tasks().get(result.task_id).await.unwrap();
        assert_eq!(task.kind, TaskKind::Import);
        assert_eq!(task.business_type, USER_IMPORT);
        assert_eq!(task.status, TaskStatus::Success);
        assert_eq!(task.created_by.as_deref(), Some("alice"));
        assert_eq!(task.source_file_ref.as_deref(), Some(source.as_str()));
        assert_eq!(task.total_rows, Some(10));
        assert_eq!(task.success_rows, Some(8));
        assert_eq!(task.error_rows, Some(2));
        assert_eq!(task.error_file_ref, Some(error_ref));
        assert!(task.error_message.is_none());
    }

    #[tokio::test]
    async fn test_clean_import_has_no_error_file() {
        let env = TestEnv::memory();
        let directory = UserDirectory::new();
        let source = env.upload_csv("users.csv", &user_csv(4, &[])).await;

        let result = env
            .pipeline
            .import::<UserRecord>(&source, &directory, None)
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.message, "Import succeeded");
        assert_eq!(result.error_rows, 0);
        assert!(result.error_file_ref.is_none());
        assert_eq!(directory.len(), 4);
        // only the uploaded source is stored
        assert_eq!(env.storage.len(), 1);
    }

    #[tokio::test]
    async fn test_import_without_rows_skips_sink() {
        let env = TestEnv::memory();
        let catalog = ProductCatalog::default();
        let source = env.upload_csv("products.csv", "SKU,Name,Price\n").await;

        let result = env
            .pipeline
            .import::<ProductRecord>(&source, &catalog, None)
            .await
            .unwrap();

        assert_eq!(result.total_rows, 0);
        assert!(result.success);
        assert_eq!(catalog.batches(), 0);
    }

    #[tokio::test]
    async fn test_every_row_invalid() {
        let env = TestEnv::memory();
        let catalog = ProductCatalog::default();
        let source = env.upload_csv("products.csv", &product_csv(3, &[1, 2, 3])).await;

        let result = env
            .pipeline
            .import::<ProductRecord>(&source, &catalog, None)
            .await
            .unwrap();

        assert_eq!(result.success_rows, 0);
        assert_eq!(result.error_rows, 3);
        assert_eq!(catalog.batches(), 0);

        let rows = env.read_csv(&result.error_file_ref.unwrap()).await;
        assert_eq!(rows.len(), 4);
        assert!(rows[1..].iter().all(|r| r[1] == "Price must not be negative"));
    }

    #[tokio::test]
    async fn test_sink_failure_fails_task() {
        let env = TestEnv::memory();
        let catalog = ProductCatalog::failing_sink();
        let source = env.upload_csv("products.csv", &product_csv(2, &[])).await;

        let err = env
            .pipeline
            .import::<ProductRecord>(&source, &catalog, None)
            .await
            .unwrap_err();

        let task_id = err.task_id().unwrap();
        assert!(matches!(err.root(), PipelineError::Sink(_)));

        let task = env.pipeline.tasks().get(task_id).await.unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(
            task.error_message.as_deref(),
            Some("Sink error: catalog is read-only")
        );
        assert!(task.total_rows.is_none());
    }

    #[tokio::test]
    async fn test_unparseable_cell_fails_task() {
        let env = TestEnv::memory();
        let catalog = ProductCatalog::default();
        let source = env
            .upload_csv("products.csv", "SKU,Name,Price\nSKU-1,Widget,cheap\n")
            .await;

        let err = env
            .pipeline
            .import::<ProductRecord>(&source, &catalog, None)
            .await
            .unwrap_err();

        assert!(matches!(err.root(), PipelineError::Codec(_)));
        let task = env.pipeline.tasks().get(err.task_id().unwrap()).await.unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert!(task.error_message.unwrap().contains("row 1 column 3 (Price)"));
        assert!(catalog.products().is_empty());
    }

    #[tokio::test]
    async fn test_missing_source_fails_task() {
        let env = TestEnv::memory();
        let directory = UserDirectory::new();

        let err = env
            .pipeline
            .import::<UserRecord>("no-such-file", &directory, None)
            .await
            .unwrap_err();

        let task = env.pipeline.tasks().get(err.task_id().unwrap()).await.unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(task.source_file_ref.as_deref(), Some("no-such-file"));
    }

    #[tokio::test]
    async fn test_storage_outage_during_error_file_upload() {
        let csv = product_csv(3, &[2]);
        let mut storage = MockStorage::new();
        storage
            .expect_get()
            .returning(move |_| Ok(csv.clone().into_bytes()));
        storage
            .expect_put()
            .times(1)
            .returning(|_, _, _| Err(PipelineError::file_storage("bucket unavailable")));

        let pipeline = Pipeline::new(
            imexport_rs::core::codec::codec_for(FileFormat::Csv),
            Arc::new(storage),
            Arc::new(InMemoryTaskStore::new()),
        );
        let catalog = ProductCatalog::default();

        let err = pipeline
            .import::<ProductRecord>("source", &catalog, None)
            .await
            .unwrap_err();

        assert!(matches!(err.root(), PipelineError::FileStorage(_)));
        // valid rows were persisted before the error file upload failed
        assert_eq!(catalog.products().len(), 2);
        let task = pipeline.tasks().get(err.task_id().unwrap()).await.unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(
            task.error_message.as_deref(),
            Some("File storage error: bucket unavailable")
        );
    }

    #[tokio::test]
    async fn test_xlsx_import_roundtrip_through_export() {
        let env = TestEnv::with_store(Arc::new(InMemoryTaskStore::new()), FileFormat::Xlsx);
        let source_directory = UserDirectory::with_sample_users();

        let exported = env
            .pipeline
            .export::<UserRecord>(&source_directory, &serde_json::json!({}), None)
            .await
            .unwrap();

        let target = UserDirectory::new();
        let result = env
            .pipeline
            .import::<UserRecord>(&exported, &target, None)
            .await
            .unwrap();

        assert_eq!(result.total_rows, 10);
        assert!(result.success);
        assert_eq!(target.users(), source_directory.users());
    }
}
