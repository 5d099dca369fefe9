//! Template generation integration tests

#[cfg(test)]
mod tests {
    use crate::common::{PUBLIC_BASE_URL, SIGNING_SECRET, TestEnv};
    use imexport_rs::business::users::{UserDirectory, UserRecord};
    use imexport_rs::core::codec::FileFormat;
    use imexport_rs::core::task::TaskQuery;
    use imexport_rs::storage::database::InMemoryTaskStore;
    use imexport_rs::storage::files::UrlSigner;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_template_is_header_only_and_untracked() {
        let env = TestEnv::memory();
        let directory = UserDirectory::new();

        let file_ref = env
            .pipeline
            .generate_template::<UserRecord>(&directory)
            .await
            .unwrap();

        assert_eq!(
            env.read_text(&file_ref).await,
            "Username,Email,Phone,Age,Department\n"
        );
        assert_eq!(
            env.storage.metadata(&file_ref).unwrap().filename,
            "user_import_template.csv"
        );
        let tasks = env.pipeline.tasks().list(&TaskQuery::default()).await.unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_template_download_url_is_signed() {
        let env = TestEnv::with_store(Arc::new(InMemoryTaskStore::new()), FileFormat::Xlsx);
        let directory = UserDirectory::new();

        let url = env
            .pipeline
            .generate_template_download_url::<UserRecord>(&directory, Duration::from_secs(600))
            .await
            .unwrap();

        assert!(url.starts_with(PUBLIC_BASE_URL));
        let parsed = url::Url::parse(&url).unwrap();
        let file_ref = parsed.path().strip_prefix("/files/").unwrap().to_string();
        let query: HashMap<String, String> = parsed.query_pairs().into_owned().collect();
        let expires: i64 = query["expires"].parse().unwrap();

        let signer = UrlSigner::new(PUBLIC_BASE_URL, Some(SIGNING_SECRET)).unwrap();
        let now = chrono::Utc::now().timestamp();
        assert!(signer.verify(&file_ref, expires, &query["signature"], now));
        assert!(!signer.verify(&file_ref, expires, &query["signature"], expires + 1));

        let name = env.storage.metadata(&file_ref).unwrap().filename;
        assert!(name.starts_with("user_import_template_"), "{}", name);
        assert!(name.ends_with(".xlsx"));
    }
}
