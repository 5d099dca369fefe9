//! Async submission and concurrent runs

#[cfg(test)]
mod tests {
    use crate::common::TestEnv;
    use crate::common::fixtures::{
        PRODUCT_IMPORT, ProductCatalog, ProductRecord, product_csv, user_csv,
    };
    use async_trait::async_trait;
    use imexport_rs::business::users::{USER_IMPORT, UserDirectory, UserRecord};
    use imexport_rs::core::provider::RowProcessor;
    use imexport_rs::{Result, TaskStatus};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Product processor that parks inside the sink until released
    #[derive(Default)]
    struct GatedCatalog {
        inner: ProductCatalog,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl RowProcessor<ProductRecord> for GatedCatalog {
        fn business_type(&self) -> &str {
            PRODUCT_IMPORT
        }

        fn validate_row(&self, record: &ProductRecord, row_index: usize) -> Option<String> {
            self.inner.validate_row(record, row_index)
        }

        async fn process_valid_rows(&self, records: Vec<ProductRecord>) -> Result<()> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.process_valid_rows(records).await
        }
    }

    #[tokio::test]
    async fn test_submit_returns_while_task_is_processing() {
        let env = TestEnv::memory();
        let catalog = Arc::new(GatedCatalog::default());
        let source = env.upload_csv("products.csv", &product_csv(3, &[])).await;

        let handle = env
            .pipeline
            .submit_import::<ProductRecord>(source, catalog.clone(), Some("dave".to_string()))
            .await
            .unwrap();
        let task_id = handle.task_id();

        catalog.entered.notified().await;
        let task = env.pipeline.tasks().get(task_id).await.unwrap();
        assert_eq!(task.status, TaskStatus::Processing);
        assert!(!handle.is_finished());

        catalog.release.notify_one();
        let result = handle.wait().await.unwrap();
        assert_eq!(result.task_id, task_id);
        assert_eq!(result.success_rows, 3);

        let task = env.pipeline.tasks().get(task_id).await.unwrap();
        assert_eq!(task.status, TaskStatus::Success);
        assert_eq!(task.created_by.as_deref(), Some("dave"));
        assert_eq!(catalog.inner.products().len(), 3);
    }

    #[tokio::test]
    async fn test_worker_limit_queues_runs() {
        let env = TestEnv::memory();
        let pipeline = env.pipeline.clone().with_max_concurrent_tasks(1);
        let gated = Arc::new(GatedCatalog::default());
        let queued = Arc::new(ProductCatalog::default());

        let first_source = env.upload_csv("a.csv", &product_csv(1, &[])).await;
        let second_source = env.upload_csv("b.csv", &product_csv(2, &[])).await;

        let first = pipeline
            .submit_import::<ProductRecord>(first_source, gated.clone(), None)
            .await
            .unwrap();
        gated.entered.notified().await;

        let second = pipeline
            .submit_import::<ProductRecord>(second_source, queued.clone(), None)
            .await
            .unwrap();
        assert_ne!(first.task_id(), second.task_id());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!second.is_finished());
        assert_eq!(queued.batches(), 0);
        let task = pipeline.tasks().get(second.task_id()).await.unwrap();
        assert_eq!(task.status, TaskStatus::Processing);

        gated.release.notify_one();
        assert_eq!(first.wait().await.unwrap().success_rows, 1);
        assert_eq!(second.wait().await.unwrap().success_rows, 2);
        assert_eq!(queued.batches(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_imports_do_not_mix() {
        let env = TestEnv::memory();
        let directory = Arc::new(UserDirectory::new());
        let catalog = Arc::new(ProductCatalog::default());

        let user_source = env.upload_csv("users.csv", &user_csv(10, &[3, 7])).await;
        let product_source = env
            .upload_csv("products.csv", &product_csv(6, &[2, 4, 6]))
            .await;

        let users = env
            .pipeline
            .submit_import::<UserRecord>(user_source.clone(), directory.clone(), None)
            .await
            .unwrap();
        let products = env
            .pipeline
            .submit_import::<ProductRecord>(product_source.clone(), catalog.clone(), None)
            .await
            .unwrap();

        let (users, products) = tokio::join!(users.wait(), products.wait());
        let users = users.unwrap();
        let products = products.unwrap();

        assert_eq!((users.success_rows, users.error_rows), (8, 2));
        assert_eq!((products.success_rows, products.error_rows), (3, 3));
        assert_eq!(directory.len(), 8);
        assert_eq!(catalog.products().len(), 3);

        let user_errors = env.read_csv(&users.error_file_ref.unwrap()).await;
        let user_indexes: Vec<&str> = user_errors[1..].iter().map(|r| r[0].as_str()).collect();
        assert_eq!(user_indexes, ["3", "7"]);
        assert!(user_errors[1..].iter().all(|r| r[2].starts_with("user")));

        let product_errors = env.read_csv(&products.error_file_ref.unwrap()).await;
        let product_indexes: Vec<&str> =
            product_errors[1..].iter().map(|r| r[0].as_str()).collect();
        assert_eq!(product_indexes, ["2", "4", "6"]);
        assert!(product_errors[1..].iter().all(|r| r[2].starts_with("SKU-")));

        let user_task = env.pipeline.tasks().get(users.task_id).await.unwrap();
        let product_task = env.pipeline.tasks().get(products.task_id).await.unwrap();
        assert_eq!(user_task.business_type, USER_IMPORT);
        assert_eq!(user_task.source_file_ref, Some(user_source));
        assert_eq!(product_task.business_type, PRODUCT_IMPORT);
        assert_eq!(product_task.source_file_ref, Some(product_source));
    }

    #[tokio::test]
    async fn test_many_parallel_exports_get_distinct_tasks() {
        let env = TestEnv::memory();
        let directory = Arc::new(UserDirectory::with_sample_users());

        let runs = (0..8).map(|_| {
            let pipeline = env.pipeline.clone();
            let directory = directory.clone();
            async move {
                pipeline
                    .export::<UserRecord>(directory.as_ref(), &serde_json::json!({}), None)
                    .await
            }
        });
        let refs: Vec<String> = futures::future::join_all(runs)
            .await
            .into_iter()
            .collect::<Result<_>>()
            .unwrap();

        let mut unique = refs.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 8);

        let tasks = env
            .pipeline
            .tasks()
            .list(&Default::default())
            .await
            .unwrap();
        assert_eq!(tasks.len(), 8);
        assert!(tasks.iter().all(|t| t.status == TaskStatus::Success));
    }
}
