//! Generated file names
//!
//! Timestamps use local time as `yyyyMMddHHmmss`.

use crate::core::codec::FileFormat;
use chrono::{DateTime, Local};

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn timestamp() -> String {
    format_timestamp(Local::now())
}

/// `{base}_{timestamp}.{ext}`
pub fn timestamped_name(base: &str, format: FileFormat) -> String {
    format!("{}_{}.{}", base, timestamp(), format.extension())
}

/// `error_{businessType}_{timestamp}.{ext}`
pub fn error_file_name(business_type: &str, format: FileFormat) -> String {
    timestamped_name(&format!("error_{}", business_type), format)
}

/// `{base}_template.{ext}`
pub fn template_name(base: &str, format: FileFormat) -> String {
    format!("{}_template.{}", base, format.extension())
}

/// `{base}_template_{timestamp}.{ext}`
pub fn timestamped_template_name(base: &str, format: FileFormat) -> String {
    timestamped_name(&format!("{}_template", base), format)
}
