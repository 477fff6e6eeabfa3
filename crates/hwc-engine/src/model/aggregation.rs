//! Action invocation and roll-up of area, leak power, energy and latency
//! across a subcomponent tree.
//!
//! Every action goes through [`invoke`]. An outermost invocation applies
//! the instance's scale factors, folds in what its direct subcomponents
//! accumulated during the call, and adds the result to the instance's own
//! accumulator. A nested invocation (an action body calling another action
//! of the same instance) returns the body's pair times its own bit-width
//! scale, and the enclosing call applies the instance's scale factors once.

use std::sync::Arc;

use hwc_core::constants::{DEFAULT_MAX_DEPTH, KEY_BITS_PER_ACTION, KEY_TIME_PERIOD, LEAK_ACTION};
use hwc_core::errors::ModelError;

use super::CostModel;
use crate::estimation::EnergyLatency;
use crate::value::Params;

/// Position of one invocation in the call tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    depth: usize,
    max_depth: usize,
    nested: bool,
}

impl CallContext {
    /// Context of a call issued from outside any model.
    pub fn root(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
            nested: false,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// `true` when issued from inside an action of the same instance.
    pub fn is_nested(&self) -> bool {
        self.nested
    }

    /// Context handed to an action body: one level deeper, nested.
    pub fn enter(&self) -> Self {
        Self {
            depth: self.depth + 1,
            max_depth: self.max_depth,
            nested: true,
        }
    }

    /// Context for calls from an action body into a subcomponent.
    pub fn subcomponent(&self) -> Self {
        Self {
            nested: false,
            ..*self
        }
    }

    fn check(&self, model: &str) -> Result<(), ModelError> {
        if self.depth > self.max_depth {
            return Err(ModelError::RecursionLimit {
                model: model.to_string(),
                depth: self.depth,
                limit: self.max_depth,
            });
        }
        Ok(())
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::root(DEFAULT_MAX_DEPTH)
    }
}

/// Invoke `action` on `model` with unbound `params`.
pub fn invoke<M: CostModel + ?Sized>(
    model: &mut M,
    action: &str,
    params: &Params,
    ctx: &CallContext,
) -> Result<EnergyLatency, ModelError> {
    let descriptor = Arc::clone(model.core().descriptor());
    let name = descriptor.name();
    ctx.check(name)?;

    let spec = descriptor
        .action(action)
        .ok_or_else(|| ModelError::UnknownAction {
            model: name.to_string(),
            action: action.to_string(),
            supported: descriptor.action_names().join(", "),
        })?;
    let (args, bits) = spec.bind(params)?;
    if !args.unused().is_empty() {
        let unused = args.unused().join(", ");
        tracing::warn!(model = name, action, unused = %unused, "unused action arguments");
        model
            .core_mut()
            .log(format!("Unused arguments ({unused}) provided for {name}.{action}"));
    }

    let bit_scale = match (bits, spec.nominal_bits_attribute()) {
        (Some(bits), Some(attribute)) => {
            let nominal = model
                .attribute(attribute)
                .ok_or_else(|| ModelError::MissingAttribute {
                    model: name.to_string(),
                    attribute: attribute.to_string(),
                })?;
            let bits = bits.as_f64(&format!("{name}.{KEY_BITS_PER_ACTION}"))?;
            let scale = bits / nominal;
            if !scale.is_finite() {
                return Err(ModelError::Scaling {
                    model: name.to_string(),
                    key: KEY_BITS_PER_ACTION.to_string(),
                    message: format!(
                        "{bits} bits per action over nominal {attribute} = {nominal} is {scale}"
                    ),
                });
            }
            scale
        }
        _ => 1.0,
    };

    let outermost = !ctx.is_nested();
    if outermost {
        for sub in model.core_mut().subcomponents_mut() {
            sub.core_mut().reset_accumulated();
        }
    }

    let is_leak = action == LEAK_ACTION;
    let body = if is_leak {
        let period = args.f64(KEY_TIME_PERIOD)?;
        let leak_power = leak_power_at(&*model, ctx.depth, ctx.max_depth)?;
        Some(EnergyLatency::energy(leak_power * period))
    } else {
        model.run_action(action, &args, &ctx.enter())?
    };

    let core = model.core_mut();
    let own = match body {
        Some(pair) => pair,
        None if !core.is_leaf() => EnergyLatency::ZERO,
        None => {
            return Err(ModelError::MissingReturn {
                model: name.to_string(),
                action: action.to_string(),
            })
        }
    };
    if !outermost {
        // Bit width belongs to this call, not to the instance.
        return Ok(EnergyLatency::new(own.energy * bit_scale, own.latency * bit_scale));
    }

    // Leak energy comes from leak power, which is already scaled.
    let (energy_scale, latency_scale) = if is_leak {
        (1.0, 1.0)
    } else {
        (core.scales().energy, core.scales().latency)
    };
    let mut energy = own.energy * energy_scale;
    let mut latency = own.latency * latency_scale;
    let mut funneled = Vec::new();
    for sub in core.subcomponents_mut() {
        let acc = sub.core().accumulated();
        energy += acc.energy;
        latency = if spec.is_pipelined() {
            latency.max(acc.latency)
        } else {
            latency + acc.latency
        };
        funneled.extend(drain_messages(sub.as_mut()));
    }
    core.extend_messages(funneled);

    let result = EnergyLatency::new(energy * bit_scale, latency * bit_scale);
    core.accumulate(result);
    Ok(result)
}

/// Own area times area scale, plus every subcomponent's total.
pub fn total_area<M: CostModel + ?Sized>(model: &M, max_depth: usize) -> Result<f64, ModelError> {
    area_at(model, 0, max_depth)
}

fn area_at<M: CostModel + ?Sized>(
    model: &M,
    depth: usize,
    max_depth: usize,
) -> Result<f64, ModelError> {
    let core = model.core();
    guard(core.name(), depth, max_depth)?;
    let mut total = core.own_area();
    for sub in core.subcomponents() {
        total += area_at(sub.as_ref(), depth + 1, max_depth)?;
    }
    Ok(total)
}

/// Own leak power times leak scale, plus every subcomponent's total.
pub fn total_leak_power<M: CostModel + ?Sized>(
    model: &M,
    max_depth: usize,
) -> Result<f64, ModelError> {
    leak_power_at(model, 0, max_depth)
}

fn leak_power_at<M: CostModel + ?Sized>(
    model: &M,
    depth: usize,
    max_depth: usize,
) -> Result<f64, ModelError> {
    let core = model.core();
    guard(core.name(), depth, max_depth)?;
    let mut total = core.own_leak_power();
    for sub in core.subcomponents() {
        total += leak_power_at(sub.as_ref(), depth + 1, max_depth)?;
    }
    Ok(total)
}

fn guard(model: &str, depth: usize, max_depth: usize) -> Result<(), ModelError> {
    CallContext {
        depth,
        max_depth,
        nested: false,
    }
    .check(model)
}

/// Take every pending message from `model` and its subcomponents, the
/// instance's own messages first.
pub fn drain_messages<M: CostModel + ?Sized>(model: &mut M) -> Vec<String> {
    let core = model.core_mut();
    let mut messages = core.take_messages();
    for sub in core.subcomponents_mut() {
        messages.extend(drain_messages(sub.as_mut()));
    }
    messages
}
