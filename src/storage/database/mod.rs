//! Task persistence
//!
//! Task records live either in process memory or in a SeaORM database
//! (SQLite by default, PostgreSQL behind the `postgres` feature).

/// Database entities module
pub mod entities;
mod memory;
/// Database migration module
pub mod migration;
/// SeaORM database implementation module
pub mod seaorm_db;
mod store;

pub use memory::InMemoryTaskStore;
pub use seaorm_db::{DatabaseBackendType, SeaOrmDatabase};
pub use store::TaskStore;

#[cfg(test)]
pub use store::MockTaskStore;

use crate::config::{TaskStoreBackend, TaskStoreConfig};
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::info;

/// Build the configured task store
pub async fn connect_task_store(config: &TaskStoreConfig) -> Result<Arc<dyn TaskStore>> {
    match config.backend {
        TaskStoreBackend::Memory => {
            info!("Using in-memory task store");
            Ok(Arc::new(InMemoryTaskStore::new()))
        }
        TaskStoreBackend::Database => {
            let database = SeaOrmDatabase::new(&config.database).await?;
            Ok(Arc::new(database))
        }
    }
}
