//! Reference "user" business: record, validation rules and an in-memory
//! directory acting as export source and import sink

use crate::core::codec::{RecordBinding, TabularRecord, parse_cell};
use crate::core::provider::{ExportProvider, RowProcessor, TemplateProvider};
use crate::core::registry::BusinessWiring;
use crate::utils::error::{PipelineError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info};

/// Registry key of the user business
pub const USER_BUSINESS: &str = "user";
pub const USER_IMPORT: &str = "USER_IMPORT";
pub const USER_EXPORT: &str = "USER_EXPORT";

const MAX_USERNAME_LEN: usize = 50;
const MAX_AGE: i32 = 150;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+$").expect("Invalid email regex")
});
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("Invalid phone regex"));

/// One user row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub department: Option<String>,
}

impl TabularRecord for UserRecord {
    fn binding() -> RecordBinding<Self> {
        RecordBinding::<Self>::new()
            .field(
                "Username",
                |u| u.username.clone(),
                |u, v| {
                    u.username = v.to_string();
                    Ok(())
                },
            )
            .field(
                "Email",
                |u| u.email.clone(),
                |u, v| {
                    u.email = v.to_string();
                    Ok(())
                },
            )
            .field(
                "Phone",
                |u| u.phone.clone().unwrap_or_default(),
                |u, v| {
                    u.phone = Some(v.to_string());
                    Ok(())
                },
            )
            .field(
                "Age",
                |u| u.age.map(|a| a.to_string()).unwrap_or_default(),
                |u, v| {
                    u.age = Some(parse_cell(v)?);
                    Ok(())
                },
            )
            .field(
                "Department",
                |u| u.department.clone().unwrap_or_default(),
                |u, v| {
                    u.department = Some(v.to_string());
                    Ok(())
                },
            )
    }
}

/// Check a user against the business rules; the first violation wins
pub fn validate_user(user: &UserRecord) -> Option<String> {
    let username = user.username.trim();
    if username.is_empty() {
        return Some("Username is required".to_string());
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Some(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LEN
        ));
    }

    let email = user.email.trim();
    if email.is_empty() {
        return Some("Email is required".to_string());
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Some("Email format is invalid".to_string());
    }

    if let Some(phone) = user.phone.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        if !PHONE_PATTERN.is_match(phone) {
            return Some("Phone number format is invalid".to_string());
        }
    }

    if let Some(age) = user.age {
        if !(0..=MAX_AGE).contains(&age) {
            return Some(format!("Age must be between 0 and {}", MAX_AGE));
        }
    }

    None
}

/// In-memory user directory
///
/// Export reads from it (optionally filtered by `department`); import
/// appends to it and rejects a batch that repeats an existing username.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: RwLock<Vec<UserRecord>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    /// Ten sample users in one department
    pub fn with_sample_users() -> Self {
        let users = (1..=10)
            .map(|i| UserRecord {
                username: format!("user{}", i),
                email: format!("user{}@example.com", i),
                phone: Some(format!("138{:08}", i)),
                age: Some(20 + i),
                department: Some("Engineering".to_string()),
            })
            .collect();
        Self::with_users(users)
    }

    pub fn users(&self) -> Vec<UserRecord> {
        self.users.read().clone()
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl ExportProvider<UserRecord> for UserDirectory {
    fn business_type(&self) -> &str {
        USER_EXPORT
    }

    fn export_file_name(&self) -> &str {
        "user_export"
    }

    async fn query_export_data(&self, params: &Value) -> Result<Vec<UserRecord>> {
        let department = match params.get("department") {
            None | Some(Value::Null) => None,
            Some(Value::String(department)) => Some(department.as_str()),
            Some(other) => {
                return Err(PipelineError::query(format!(
                    "department filter must be a string, got {}",
                    other
                )));
            }
        };

        let users: Vec<UserRecord> = self
            .users
            .read()
            .iter()
            .filter(|u| department.is_none_or(|d| u.department.as_deref() == Some(d)))
            .cloned()
            .collect();

        info!(count = users.len(), ?department, "Queried users for export");
        Ok(users)
    }
}

impl TemplateProvider<UserRecord> for UserDirectory {
    fn business_type(&self) -> &str {
        USER_IMPORT
    }

    fn template_file_name(&self) -> &str {
        "user_import"
    }
}

#[async_trait]
impl RowProcessor<UserRecord> for UserDirectory {
    fn business_type(&self) -> &str {
        USER_IMPORT
    }

    fn validate_row(&self, record: &UserRecord, row_index: usize) -> Option<String> {
        let result = validate_user(record);
        if let Some(message) = &result {
            debug!(row_index, error = %message, "User row rejected");
        }
        result
    }

    async fn process_valid_rows(&self, records: Vec<UserRecord>) -> Result<()> {
        let mut users = self.users.write();

        let mut seen: HashSet<&str> = users.iter().map(|u| u.username.as_str()).collect();
        for record in &records {
            if !seen.insert(record.username.as_str()) {
                return Err(PipelineError::sink(format!(
                    "duplicate username: {}",
                    record.username
                )));
            }
        }

        info!(count = records.len(), "Saving imported users");
        users.extend(records);
        Ok(())
    }
}

/// Wiring of the user business around a directory
pub fn wiring(directory: Arc<UserDirectory>) -> BusinessWiring<UserRecord> {
    BusinessWiring::new(USER_BUSINESS)
        .with_exporter(directory.clone())
        .with_processor(directory.clone())
        .with_template(directory)
}
