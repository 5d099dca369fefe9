//! Configuration validation
//!
//! Each configuration section implements [`Validate`]; errors are plain
//! strings that [`crate::config::Config::validate`] prefixes with the section name.

mod runtime_validators;
mod storage_validators;
mod trait_def;

pub use trait_def::Validate;
