// Module declarations
mod connection;
mod task_ops;
mod types;

// Re-export public types
pub use types::{DatabaseBackendType, SeaOrmDatabase};
