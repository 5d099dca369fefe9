//! # imexport-rs
//!
//! A format-agnostic batch import/export pipeline.
//!
//! Business types describe their records once through an explicit column
//! binding and plug in small provider roles; the pipeline takes care of
//! tabular encoding, object storage, task tracking, per-row validation and
//! error-file generation.
//!
//! ## Features
//!
//! - **Task tracking**: every import and export is a task that ends SUCCESS or FAILED exactly once
//! - **Partial imports**: invalid rows are collected into an error file, valid rows are persisted in one batch
//! - **CSV and XLSX**: one engine, codecs selected per pipeline
//! - **Pluggable storage**: local disk, memory or S3, with expiring download URLs
//! - **Async runs**: submit a run, get the task id back, poll for the outcome
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imexport_rs::business::users::{UserDirectory, UserRecord};
//! use imexport_rs::{Config, Pipeline};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/imexport.yaml").await?;
//!     let pipeline = Pipeline::from_config(&config).await?;
//!     let directory = Arc::new(UserDirectory::with_sample_users());
//!
//!     let file_ref = pipeline
//!         .export::<UserRecord>(directory.as_ref(), &serde_json::json!({}), None)
//!         .await?;
//!     println!("Exported to {}", file_ref);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod business;
pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{PipelineError, Result};

pub use core::codec::{
    CsvCodec, FileFormat, RecordBinding, TabularCodec, TabularRecord, XlsxCodec, parse_cell,
};
pub use core::observer::{NoopObserver, PipelineObserver, RowOutcome, TracingObserver};
pub use core::pipeline::{ImportResult, Pipeline, TaskHandle};
pub use core::provider::{ExportProvider, RowProcessor, TemplateProvider};
pub use core::registry::{BusinessHandler, BusinessRegistry, BusinessWiring};
pub use core::task::{Task, TaskId, TaskKind, TaskStatus};
pub use storage::database::{InMemoryTaskStore, SeaOrmDatabase, TaskStore};
pub use storage::files::{FileStorage, MemoryStorage, ObjectStorage};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Unix time of the build
    pub build_time: &'static str,
    /// Short commit hash, `-dirty` when built from a modified tree
    pub git_commit: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("IMEXPORT_BUILD_TIME"),
            git_commit: env!("IMEXPORT_GIT_COMMIT"),
            rust_version: env!("IMEXPORT_RUSTC"),
        }
    }
}

/// Metadata of the running build
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
