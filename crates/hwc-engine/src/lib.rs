//! Cost-model resolution and aggregation engine.
//!
//! Cost models describe themselves through [`ModelType::describe`], are
//! registered in a [`ModelRegistry`], and are selected per query by the
//! [`Resolver`]. Energy and latency roll up through subcomponent trees via
//! [`model::invoke`]. [`Estimator`] wraps it all behind
//! `get_energy`/`get_area`/`get_leak_power`/`get_model`.

pub mod descriptor;
pub mod estimation;
pub mod estimator;
pub mod model;
pub mod query;
pub mod reference;
pub mod registry;
pub mod resolver;
pub mod scaling;
pub mod value;

pub use descriptor::{ActionSpec, Args, CapabilityDescriptor, DescriptorBuilder, Signature};
pub use estimation::{EnergyLatency, Estimation};
pub use estimator::Estimator;
pub use model::{CallContext, CostModel, ModelCore, ModelType};
pub use query::{Query, Selection};
pub use registry::{ModelEntry, ModelRegistry};
pub use resolver::{Estimate, Resolver, Target};
pub use scaling::{Dimension, ScaleFactors, ScaleFn};
pub use value::{ParamValue, Params};
