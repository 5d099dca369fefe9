//! Storage layer for the pipeline
//!
//! Task records live in [`database`]; uploaded sources and generated files
//! live in [`files`].

/// Task store backends
pub mod database;
/// Object storage backends
pub mod files;
