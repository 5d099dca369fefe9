//! Common test utilities for imexport-rs
//!
//! # Usage
//!
//! ```rust
//! use crate::common::{self, fixtures};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let env = common::TestEnv::memory();
//!     let file_ref = env.upload_csv("users.csv", &fixtures::user_csv(&[])).await;
//!     // ...
//! }
//! ```

pub mod fixtures;

use imexport_rs::config::DatabaseConfig;
use imexport_rs::core::codec::{FileFormat, codec_for};
use imexport_rs::storage::database::{InMemoryTaskStore, SeaOrmDatabase, TaskStore};
use imexport_rs::storage::files::{MemoryStorage, ObjectStorage, UrlSigner};
use imexport_rs::{NoopObserver, Pipeline};
use std::sync::Arc;

pub const SIGNING_SECRET: &str = "integration-test-secret";
pub const PUBLIC_BASE_URL: &str = "http://files.test";

/// A pipeline plus direct handles on its storage
pub struct TestEnv {
    pub pipeline: Pipeline,
    pub storage: MemoryStorage,
}

impl TestEnv {
    /// CSV pipeline over memory storage and an in-memory task store
    pub fn memory() -> Self {
        Self::with_store(Arc::new(InMemoryTaskStore::new()), FileFormat::Csv)
    }

    /// CSV pipeline whose task records live in an in-memory SQLite database
    pub async fn sqlite() -> Self {
        let database = SeaOrmDatabase::new(&DatabaseConfig::sqlite_memory())
            .await
            .expect("Failed to create SQLite task store");
        Self::with_store(Arc::new(database), FileFormat::Csv)
    }

    pub fn with_store(store: Arc<dyn TaskStore>, format: FileFormat) -> Self {
        let storage = memory_storage();
        let pipeline = Pipeline::new(codec_for(format), Arc::new(storage.clone()), store)
            .with_observer(Arc::new(NoopObserver));
        Self { pipeline, storage }
    }

    /// Put a source file into storage the way an upload endpoint would
    pub async fn upload_csv(&self, name: &str, content: &str) -> String {
        self.storage
            .put(content.as_bytes(), name, FileFormat::Csv.content_type())
            .await
            .expect("Failed to upload source file")
    }

    /// Load a stored file as UTF-8 text
    pub async fn read_text(&self, file_ref: &str) -> String {
        let bytes = self
            .storage
            .get(file_ref)
            .await
            .expect("Stored file is missing");
        String::from_utf8(bytes).expect("Stored file is not UTF-8")
    }

    /// Parse a stored CSV file into rows, header first
    pub async fn read_csv(&self, file_ref: &str) -> Vec<Vec<String>> {
        let text = self.read_text(file_ref).await;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        reader
            .records()
            .map(|r| r.expect("Malformed CSV").iter().map(str::to_string).collect())
            .collect()
    }
}

pub fn memory_storage() -> MemoryStorage {
    let signer = UrlSigner::new(PUBLIC_BASE_URL, Some(SIGNING_SECRET)).expect("Invalid signer");
    MemoryStorage::new(signer)
}
