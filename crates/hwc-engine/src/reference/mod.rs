//! Reference cost models shipped with the engine.

pub mod ternary_mac;

pub use ternary_mac::TernaryMac;

use hwc_core::errors::RegistryError;

use crate::registry::ModelRegistry;

/// A registry holding every reference model.
pub fn reference_registry() -> Result<ModelRegistry, RegistryError> {
    let mut registry = ModelRegistry::new();
    registry.register::<TernaryMac>()?;
    Ok(registry)
}
