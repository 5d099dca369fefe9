//! Task tracking
//!
//! A task records one tracked pipeline run (import or export) from creation
//! to its single finalization.

mod lifecycle;
mod types;

pub use lifecycle::TaskLifecycle;
pub use types::*;
