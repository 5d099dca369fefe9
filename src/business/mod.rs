//! Business wirings shipped with the crate

pub mod users;

use crate::core::registry::BusinessRegistry;
use crate::utils::error::Result;
use std::sync::Arc;

/// Registry with every built-in business type
pub fn default_registry(directory: Arc<users::UserDirectory>) -> Result<BusinessRegistry> {
    let mut registry = BusinessRegistry::new();
    registry.register(Arc::new(users::wiring(directory)))?;
    Ok(registry)
}
