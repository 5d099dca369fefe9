//! Task store configuration

use super::{default_connection_timeout, default_max_connections};
use serde::{Deserialize, Serialize};

/// Which backend keeps task records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStoreBackend {
    /// Process-local map, lost on restart
    #[default]
    Memory,
    /// SeaORM database (SQLite or PostgreSQL)
    Database,
}

/// Task store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaskStoreConfig {
    /// Backend kind
    #[serde(default)]
    pub backend: TaskStoreBackend,
    /// Database configuration, used by the database backend
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl TaskStoreConfig {
    /// Merge task store configurations (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        if other.backend != TaskStoreBackend::default() {
            self.backend = other.backend;
        }
        self.database = self.database.merge(other.database);
        self
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Maximum connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
    /// Run migrations when connecting
    #[serde(default = "default_true")]
    pub auto_migrate: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/imexport.db?mode=rwc".to_string(),
            max_connections: default_max_connections(),
            connection_timeout: default_connection_timeout(),
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    /// Isolated in-memory SQLite database, one connection
    pub fn sqlite_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connection_timeout: default_connection_timeout(),
            auto_migrate: true,
        }
    }

    /// Merge database configurations
    pub fn merge(mut self, other: Self) -> Self {
        if !other.url.is_empty() && other.url != Self::default().url {
            self.url = other.url;
        }
        if other.max_connections != default_max_connections() {
            self.max_connections = other.max_connections;
        }
        if other.connection_timeout != default_connection_timeout() {
            self.connection_timeout = other.connection_timeout;
        }
        if !other.auto_migrate {
            self.auto_migrate = false;
        }
        self
    }
}
