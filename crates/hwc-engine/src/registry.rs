//! The candidate pool: an ordered list of registered model types.

use std::fmt;
use std::sync::Arc;

use hwc_core::errors::{ModelError, RegistryError};

use crate::descriptor::{descriptor_of, Args, CapabilityDescriptor};
use crate::model::{CostModel, ModelType};

/// Type-erased constructor of one model type.
pub type Constructor = fn(&Args) -> Result<Box<dyn CostModel>, ModelError>;

/// One candidate: its descriptor and a way to build it.
#[derive(Clone)]
pub struct ModelEntry {
    descriptor: Arc<CapabilityDescriptor>,
    construct: Constructor,
}

impl ModelEntry {
    pub fn of<M: ModelType>() -> Result<Self, RegistryError> {
        Ok(Self {
            descriptor: descriptor_of::<M>()?,
            construct: construct_boxed::<M>,
        })
    }

    pub fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn priority(&self) -> f64 {
        self.descriptor.priority()
    }

    pub fn construct(&self, args: &Args) -> Result<Box<dyn CostModel>, ModelError> {
        (self.construct)(args)
    }
}

fn construct_boxed<M: ModelType>(args: &Args) -> Result<Box<dyn CostModel>, ModelError> {
    Ok(Box::new(M::construct(args)?))
}

impl fmt::Debug for ModelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelEntry")
            .field("name", &self.name())
            .field("priority", &self.priority())
            .finish()
    }
}

/// Registered model types in registration order.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    entries: Vec<ModelEntry>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append `M`. Registering the same type twice is a no-op.
    pub fn register<M: ModelType>(&mut self) -> Result<&mut Self, RegistryError> {
        let entry = ModelEntry::of::<M>()?;
        if !self
            .entries
            .iter()
            .any(|e| Arc::ptr_eq(&e.descriptor, &entry.descriptor))
        {
            tracing::debug!(model = entry.name(), "registered cost model");
            self.entries.push(entry);
        }
        Ok(self)
    }

    pub fn entries(&self) -> &[ModelEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ModelEntry> {
        self.entries.iter().find(|e| e.descriptor.is_named(name))
    }

    /// Every distinct component alias, sorted.
    pub fn component_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .iter()
            .flat_map(|e| e.descriptor.component_names().iter().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", entry.descriptor)?;
        }
        Ok(())
    }
}
