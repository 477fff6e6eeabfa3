//! Public entry points: energy, latency, area, leak power and model lookup
//! over a registry of cost models.

use hwc_core::config::HwcConfig;
use hwc_core::errors::ResolveError;
use hwc_core::messages::MessageSink;

use crate::estimation::Estimation;
use crate::model::CostModel;
use crate::query::Query;
use crate::registry::{ModelEntry, ModelRegistry};
use crate::resolver::{Estimate, Resolver, Target};
use crate::value::Params;

/// A registry plus the resolver that answers queries against it.
///
/// Every operation has a `_with` variant that resolves against an explicit
/// candidate pool instead of the registry, and an `estimate_` variant that
/// returns the full [`Estimation`] instead of the bare number.
#[derive(Debug)]
pub struct Estimator {
    registry: ModelRegistry,
    resolver: Resolver,
}

impl Estimator {
    pub fn new(registry: ModelRegistry) -> Self {
        Self::with_config(registry, &HwcConfig::default())
    }

    pub fn with_config(registry: ModelRegistry, config: &HwcConfig) -> Self {
        Self {
            registry,
            resolver: Resolver::new(config),
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ModelRegistry {
        &mut self.registry
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Resolve an arbitrary query. `pool` defaults to the registry.
    pub fn estimate(
        &mut self,
        query: &Query,
        target: Target,
        pool: Option<&[ModelEntry]>,
    ) -> Result<Estimation<Estimate>, ResolveError> {
        let candidates = pool.unwrap_or(self.registry.entries());
        self.resolver.resolve(query, candidates, target)
    }

    fn numeric(
        &mut self,
        query: &Query,
        target: Target,
        pool: Option<&[ModelEntry]>,
    ) -> Result<Estimation<f64>, ResolveError> {
        let estimation = self.estimate(query, target, pool)?;
        into_value(estimation, &query.component_name)
    }

    // ---- energy ----

    pub fn estimate_energy_with(
        &mut self,
        pool: &[ModelEntry],
        component: &str,
        attributes: Params,
        action: &str,
        arguments: Params,
    ) -> Result<Estimation<f64>, ResolveError> {
        let query = Query::new(component, attributes).with_action(action, arguments);
        self.numeric(&query, Target::Energy, Some(pool))
    }

    pub fn estimate_energy(
        &mut self,
        component: &str,
        attributes: Params,
        action: &str,
        arguments: Params,
    ) -> Result<Estimation<f64>, ResolveError> {
        let query = Query::new(component, attributes).with_action(action, arguments);
        self.numeric(&query, Target::Energy, None)
    }

    /// Energy in Joules of one `action` on `component`.
    pub fn get_energy(
        &mut self,
        component: &str,
        attributes: Params,
        action: &str,
        arguments: Params,
    ) -> Result<f64, ResolveError> {
        Ok(self
            .estimate_energy(component, attributes, action, arguments)?
            .value)
    }

    pub fn get_energy_with(
        &mut self,
        pool: &[ModelEntry],
        component: &str,
        attributes: Params,
        action: &str,
        arguments: Params,
    ) -> Result<f64, ResolveError> {
        Ok(self
            .estimate_energy_with(pool, component, attributes, action, arguments)?
            .value)
    }

    // ---- latency ----

    pub fn estimate_latency_with(
        &mut self,
        pool: &[ModelEntry],
        component: &str,
        attributes: Params,
        action: &str,
        arguments: Params,
    ) -> Result<Estimation<f64>, ResolveError> {
        let query = Query::new(component, attributes).with_action(action, arguments);
        self.numeric(&query, Target::Latency, Some(pool))
    }

    pub fn estimate_latency(
        &mut self,
        component: &str,
        attributes: Params,
        action: &str,
        arguments: Params,
    ) -> Result<Estimation<f64>, ResolveError> {
        let query = Query::new(component, attributes).with_action(action, arguments);
        self.numeric(&query, Target::Latency, None)
    }

    /// Latency in seconds of one `action` on `component`.
    pub fn get_latency(
        &mut self,
        component: &str,
        attributes: Params,
        action: &str,
        arguments: Params,
    ) -> Result<f64, ResolveError> {
        Ok(self
            .estimate_latency(component, attributes, action, arguments)?
            .value)
    }

    pub fn get_latency_with(
        &mut self,
        pool: &[ModelEntry],
        component: &str,
        attributes: Params,
        action: &str,
        arguments: Params,
    ) -> Result<f64, ResolveError> {
        Ok(self
            .estimate_latency_with(pool, component, attributes, action, arguments)?
            .value)
    }

    // ---- area ----

    pub fn estimate_area_with(
        &mut self,
        pool: &[ModelEntry],
        component: &str,
        attributes: Params,
    ) -> Result<Estimation<f64>, ResolveError> {
        self.numeric(&Query::new(component, attributes), Target::Area, Some(pool))
    }

    pub fn estimate_area(
        &mut self,
        component: &str,
        attributes: Params,
    ) -> Result<Estimation<f64>, ResolveError> {
        self.numeric(&Query::new(component, attributes), Target::Area, None)
    }

    /// Area in m^2 of `component`.
    pub fn get_area(&mut self, component: &str, attributes: Params) -> Result<f64, ResolveError> {
        Ok(self.estimate_area(component, attributes)?.value)
    }

    pub fn get_area_with(
        &mut self,
        pool: &[ModelEntry],
        component: &str,
        attributes: Params,
    ) -> Result<f64, ResolveError> {
        Ok(self.estimate_area_with(pool, component, attributes)?.value)
    }

    // ---- leak power ----

    pub fn estimate_leak_power_with(
        &mut self,
        pool: &[ModelEntry],
        component: &str,
        attributes: Params,
    ) -> Result<Estimation<f64>, ResolveError> {
        self.numeric(&Query::new(component, attributes), Target::LeakPower, Some(pool))
    }

    pub fn estimate_leak_power(
        &mut self,
        component: &str,
        attributes: Params,
    ) -> Result<Estimation<f64>, ResolveError> {
        self.numeric(&Query::new(component, attributes), Target::LeakPower, None)
    }

    /// Leak power in Watts of `component`.
    pub fn get_leak_power(
        &mut self,
        component: &str,
        attributes: Params,
    ) -> Result<f64, ResolveError> {
        Ok(self.estimate_leak_power(component, attributes)?.value)
    }

    pub fn get_leak_power_with(
        &mut self,
        pool: &[ModelEntry],
        component: &str,
        attributes: Params,
    ) -> Result<f64, ResolveError> {
        Ok(self.estimate_leak_power_with(pool, component, attributes)?.value)
    }

    // ---- model selection ----

    pub fn estimate_model_with(
        &mut self,
        pool: &[ModelEntry],
        component: &str,
        attributes: Params,
        required_actions: &[&str],
    ) -> Result<Estimation<Estimate>, ResolveError> {
        let query = Query::new(component, attributes).requiring(required_actions.iter().copied());
        self.estimate(&query, Target::ModelSelection, Some(pool))
    }

    pub fn estimate_model(
        &mut self,
        component: &str,
        attributes: Params,
        required_actions: &[&str],
    ) -> Result<Estimation<Estimate>, ResolveError> {
        let query = Query::new(component, attributes).requiring(required_actions.iter().copied());
        self.estimate(&query, Target::ModelSelection, None)
    }

    /// The highest-priority model that can be built for `component` and
    /// supports every action in `required_actions`.
    pub fn get_model(
        &mut self,
        component: &str,
        attributes: Params,
        required_actions: &[&str],
    ) -> Result<Box<dyn CostModel>, ResolveError> {
        let estimation = self.estimate_model(component, attributes, required_actions)?;
        into_model(estimation, component)
    }

    pub fn get_model_with(
        &mut self,
        pool: &[ModelEntry],
        component: &str,
        attributes: Params,
        required_actions: &[&str],
    ) -> Result<Box<dyn CostModel>, ResolveError> {
        let estimation = self.estimate_model_with(pool, component, attributes, required_actions)?;
        into_model(estimation, component)
    }

    /// Drain resolution summaries from the message log. Undrained summaries
    /// accumulate up to `logging.capacity` per channel.
    pub fn drain_messages(&mut self, channel: &str) -> Vec<String> {
        self.resolver.log_mut().drain(channel)
    }

    /// Drain every channel of the message log.
    pub fn drain_all_messages(&mut self) -> Vec<(String, Vec<String>)> {
        self.resolver.log_mut().drain_all()
    }
}

fn wrong_kind(component: &str, message: &str) -> ResolveError {
    ResolveError::Usage {
        model: component.to_string(),
        source: hwc_core::errors::ModelError::usage(component, message),
    }
}

fn into_value(
    estimation: Estimation<Estimate>,
    component: &str,
) -> Result<Estimation<f64>, ResolveError> {
    let value = estimation.value.as_value().ok_or_else(|| {
        wrong_kind(component, "numeric estimation produced a model instead of a value")
    })?;
    Ok(estimation.map(|_| value))
}

fn into_model(
    estimation: Estimation<Estimate>,
    component: &str,
) -> Result<Box<dyn CostModel>, ResolveError> {
    estimation.value.into_model().ok_or_else(|| {
        wrong_kind(component, "model selection produced a value instead of a model")
    })
}
