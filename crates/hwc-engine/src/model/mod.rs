//! The cost-model contract.
//!
//! A model type implements [`ModelType`] (static description and
//! construction) and [`CostModel`] (per-instance behaviour). All state the
//! engine manages on behalf of a model lives in its [`ModelCore`].

pub mod aggregation;

use std::fmt;
use std::sync::Arc;

use hwc_core::errors::ModelError;
use hwc_core::types::SmallVec4;

use crate::descriptor::{descriptor_of, Args, CapabilityDescriptor, DescriptorBuilder};
use crate::estimation::EnergyLatency;
use crate::scaling::{self, Dimension, ScaleFactors, ScaleFn};
use crate::value::Params;

pub use aggregation::{drain_messages, invoke, total_area, total_leak_power, CallContext};

/// Behaviour of one cost-model instance.
pub trait CostModel {
    fn core(&self) -> &ModelCore;

    fn core_mut(&mut self) -> &mut ModelCore;

    /// Evaluate one declared action. `args` are already bound to the
    /// action's signature. Composite models may return `None` to report no
    /// energy or latency of their own.
    ///
    /// Only called through [`invoke`], which handles scaling and
    /// subcomponent accumulation.
    fn run_action(
        &mut self,
        action: &str,
        _args: &Args,
        _ctx: &CallContext,
    ) -> Result<Option<EnergyLatency>, ModelError> {
        let descriptor = self.core().descriptor();
        Err(ModelError::UnknownAction {
            model: descriptor.name().to_string(),
            action: action.to_string(),
            supported: descriptor.action_names().join(", "),
        })
    }

    /// Numeric attribute lookup, used for nominal bits per action.
    fn attribute(&self, _name: &str) -> Option<f64> {
        None
    }

    fn name(&self) -> &str {
        self.core().descriptor().name()
    }
}

impl fmt::Debug for dyn CostModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CostModel")
            .field("name", &self.name())
            .field("core", self.core())
            .finish()
    }
}

/// Static side of a cost model: its descriptor and constructor.
pub trait ModelType: CostModel + Sized + 'static {
    /// Declare aliases, priority, constructor parameters, and actions.
    fn describe() -> DescriptorBuilder;

    /// Build an instance from bound constructor arguments. Return
    /// [`ModelError::Declined`] when the arguments are outside what the
    /// model supports.
    fn construct(args: &Args) -> Result<Self, ModelError>;
}

/// Engine-managed state of one model instance.
pub struct ModelCore {
    descriptor: Arc<CapabilityDescriptor>,
    area: f64,
    leak_power: f64,
    scales: ScaleFactors,
    subcomponents: SmallVec4<Box<dyn CostModel>>,
    accumulated: EnergyLatency,
    messages: Vec<String>,
}

impl ModelCore {
    /// State of a leaf model. Leaves state their own area and leak power.
    pub fn leaf<M: ModelType>(area: f64, leak_power: f64) -> Result<Self, ModelError> {
        let descriptor = descriptor_for::<M>()?;
        Ok(Self::with_descriptor(descriptor, area, leak_power))
    }

    /// State of a composite model whose area and leak power default to the
    /// sums over `subcomponents`.
    pub fn composite<M: ModelType>(
        subcomponents: Vec<Box<dyn CostModel>>,
    ) -> Result<Self, ModelError> {
        let descriptor = descriptor_for::<M>()?;
        if subcomponents.is_empty() {
            return Err(ModelError::usage(
                descriptor.name(),
                "composite models need at least one subcomponent; leaf models must provide area and leak power",
            ));
        }
        let mut core = Self::with_descriptor(descriptor, 0.0, 0.0);
        core.subcomponents.extend(subcomponents);
        Ok(core)
    }

    fn with_descriptor(descriptor: Arc<CapabilityDescriptor>, area: f64, leak_power: f64) -> Self {
        Self {
            descriptor,
            area,
            leak_power,
            scales: ScaleFactors::default(),
            subcomponents: SmallVec4::new(),
            accumulated: EnergyLatency::ZERO,
            messages: Vec::new(),
        }
    }

    /// Own area in addition to the subcomponent sum.
    pub fn with_area(mut self, area: f64) -> Self {
        self.area = area;
        self
    }

    /// Own leak power in addition to the subcomponent sum.
    pub fn with_leak_power(mut self, leak_power: f64) -> Self {
        self.leak_power = leak_power;
        self
    }

    pub fn descriptor(&self) -> &Arc<CapabilityDescriptor> {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// Own area after scaling, excluding subcomponents.
    pub fn own_area(&self) -> f64 {
        self.area * self.scales.area
    }

    /// Own leak power after scaling, excluding subcomponents.
    pub fn own_leak_power(&self) -> f64 {
        self.leak_power * self.scales.leak
    }

    pub fn scales(&self) -> &ScaleFactors {
        &self.scales
    }

    pub fn scales_mut(&mut self) -> &mut ScaleFactors {
        &mut self.scales
    }

    pub fn subcomponents(&self) -> &[Box<dyn CostModel>] {
        &self.subcomponents
    }

    pub fn subcomponents_mut(&mut self) -> &mut [Box<dyn CostModel>] {
        &mut self.subcomponents
    }

    pub fn is_leaf(&self) -> bool {
        self.subcomponents.is_empty()
    }

    /// Energy and latency accumulated by outermost action calls.
    pub fn accumulated(&self) -> EnergyLatency {
        self.accumulated
    }

    pub fn reset_accumulated(&mut self) {
        self.accumulated = EnergyLatency::ZERO;
    }

    pub(crate) fn accumulate(&mut self, amount: EnergyLatency) {
        self.accumulated += amount;
    }

    /// Append a diagnostic message to this instance's trail.
    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(model = self.descriptor.name(), "{message}");
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub(crate) fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    pub(crate) fn extend_messages(&mut self, messages: Vec<String>) {
        self.messages.extend(messages);
    }

    /// Adapt this instance from `default` to `target` for parameter `key`.
    ///
    /// Every rule multiplies one dimension's scale factor by
    /// `func(target, default)`. Nothing changes when `target == default`.
    /// Returns `target`.
    pub fn scale(
        &mut self,
        key: &str,
        target: f64,
        default: f64,
        rules: &[(Dimension, ScaleFn)],
    ) -> Result<f64, ModelError> {
        if target == default {
            return Ok(target);
        }
        let applied = scaling::apply(&mut self.scales, target, default, rules).map_err(
            |(dimension, factor)| ModelError::Scaling {
                model: self.descriptor.name().to_string(),
                key: key.to_string(),
                message: format!(
                    "{dimension} multiplier {factor} when scaling from {default} to {target}"
                ),
            },
        )?;
        for (dimension, factor) in applied {
            self.log(format!(
                "Scaled {key} from {default} to {target}: {dimension} multiplied by {factor}"
            ));
        }
        Ok(target)
    }

    /// Invoke `action` on subcomponent `index` from inside an action body.
    pub fn invoke_subcomponent(
        &mut self,
        index: usize,
        action: &str,
        params: &Params,
        ctx: &CallContext,
    ) -> Result<EnergyLatency, ModelError> {
        let model = self.descriptor.name().to_string();
        let count = self.subcomponents.len();
        let sub = self.subcomponents.get_mut(index).ok_or_else(|| {
            ModelError::usage(
                model,
                format!("subcomponent index {index} out of range ({count} subcomponents)"),
            )
        })?;
        invoke(sub.as_mut(), action, params, &ctx.subcomponent())
    }
}

impl fmt::Debug for ModelCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelCore")
            .field("model", &self.descriptor.name())
            .field("area", &self.area)
            .field("leak_power", &self.leak_power)
            .field("scales", &self.scales)
            .field("subcomponents", &self.subcomponents.len())
            .field("accumulated", &self.accumulated)
            .finish()
    }
}

fn descriptor_for<M: ModelType>() -> Result<Arc<CapabilityDescriptor>, ModelError> {
    descriptor_of::<M>().map_err(|e| ModelError::usage(std::any::type_name::<M>(), e.to_string()))
}
