//! Error handling for the import/export pipeline
//!
//! This module defines the error type shared by the pipeline core, the storage
//! adapters and business wiring.

#![allow(missing_docs)]

mod helpers;
mod types;

pub use types::{PipelineError, Result};
