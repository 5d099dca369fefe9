//! Export pipeline integration tests

#[cfg(test)]
mod tests {
    use crate::common::TestEnv;
    use crate::common::fixtures::{PRODUCT_EXPORT, ProductCatalog, ProductRecord, product};
    use imexport_rs::business::users::{USER_EXPORT, UserDirectory, UserRecord};
    use imexport_rs::core::codec::{FileFormat, TabularCodec, XlsxCodec};
    use imexport_rs::core::task::TaskQuery;
    use imexport_rs::storage::database::InMemoryTaskStore;
    use imexport_rs::storage::files::ObjectStorage;
    use imexport_rs::{PipelineError, TaskKind, TaskStatus};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_export_users_by_department() {
        let env = TestEnv::memory();
        let mut users = UserDirectory::with_sample_users().users();
        users[0].department = Some("Sales".to_string());
        let directory = UserDirectory::with_users(users);

        let params = json!({ "department": "Engineering" });
        let file_ref = env
            .pipeline
            .export::<UserRecord>(&directory, &params, Some("bob"))
            .await
            .unwrap();

        let rows = env.read_csv(&file_ref).await;
        assert_eq!(rows[0], ["Username", "Email", "Phone", "Age", "Department"]);
        assert_eq!(rows.len(), 10);
        assert_eq!(
            rows[1],
            ["user2", "user2@example.com", "13800000002", "22", "Engineering"]
        );

        let tasks = env.pipeline.tasks().list(&TaskQuery::default()).await.unwrap();
        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert_eq!(task.kind, TaskKind::Export);
        assert_eq!(task.business_type, USER_EXPORT);
        assert_eq!(task.status, TaskStatus::Success);
        assert_eq!(task.file_ref.as_deref(), Some(file_ref.as_str()));
        assert_eq!(task.total_rows, Some(9));
        assert_eq!(task.created_by.as_deref(), Some("bob"));

        let stored: serde_json::Value =
            serde_json::from_str(task.query_params.as_deref().unwrap()).unwrap();
        assert_eq!(stored, params);
    }

    #[tokio::test]
    async fn test_export_file_is_named_and_timestamped() {
        let env = TestEnv::memory();
        let catalog = ProductCatalog::with_products(vec![product(1)]);

        let file_ref = env
            .pipeline
            .export::<ProductRecord>(&catalog, &json!({}), None)
            .await
            .unwrap();

        let name = env.storage.metadata(&file_ref).unwrap().filename;
        // product_export_YYYYMMDDHHMMSS.csv
        let stamp = name
            .strip_prefix("product_export_")
            .and_then(|rest| rest.strip_suffix(".csv"))
            .unwrap();
        assert_eq!(stamp.len(), 14);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_empty_export_writes_headers_only() {
        let env = TestEnv::memory();
        let catalog = ProductCatalog::with_products(vec![product(1), product(2)]);

        let file_ref = env
            .pipeline
            .export::<ProductRecord>(&catalog, &json!({ "minPrice": 1000.0 }), None)
            .await
            .unwrap();

        assert_eq!(env.read_text(&file_ref).await, "SKU,Name,Price\n");
        let tasks = env.pipeline.tasks().list(&TaskQuery::default()).await.unwrap();
        assert_eq!(tasks[0].status, TaskStatus::Success);
        assert_eq!(tasks[0].total_rows, Some(0));
        assert_eq!(tasks[0].business_type, PRODUCT_EXPORT);
    }

    #[tokio::test]
    async fn test_xlsx_export_decodes_back() {
        let env = TestEnv::with_store(Arc::new(InMemoryTaskStore::new()), FileFormat::Xlsx);
        let catalog = ProductCatalog::with_products(vec![product(1), product(2), product(3)]);

        let file_ref = env
            .pipeline
            .export::<ProductRecord>(&catalog, &json!({}), None)
            .await
            .unwrap();

        let meta = env.storage.metadata(&file_ref).unwrap();
        assert!(meta.filename.ends_with(".xlsx"));
        assert_eq!(meta.content_type, FileFormat::Xlsx.content_type());

        let bytes = env.storage.get(&file_ref).await.unwrap();
        let table = XlsxCodec::default().read_table(&bytes).unwrap();
        assert_eq!(table.headers, ["SKU", "Name", "Price"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[2], ["SKU-0003", "Product 3", "3.5"]);
    }

    #[tokio::test]
    async fn test_query_failure_marks_task_failed() {
        let env = TestEnv::memory();
        let directory = UserDirectory::with_sample_users();

        let err = env
            .pipeline
            .export::<UserRecord>(&directory, &json!({ "department": 42 }), None)
            .await
            .unwrap_err();

        assert!(matches!(err.root(), PipelineError::Query(_)));
        let task = env.pipeline.tasks().get(err.task_id().unwrap()).await.unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert!(task.file_ref.is_none());
        assert!(
            task.error_message
                .unwrap()
                .starts_with("Query error: department filter must be a string")
        );
        // nothing was uploaded
        assert!(env.storage.is_empty());
    }
}
