//! Scale factors and the scale-function family models use to adapt their
//! nominal numbers to a requested parameter value.

pub mod functions;
pub mod tech_node;

use std::fmt;

use serde::Serialize;

/// The four scalable quantities of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Dimension {
    Area,
    Energy,
    Latency,
    Leak,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [Self::Area, Self::Energy, Self::Latency, Self::Leak];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Area => "area_scale",
            Self::Energy => "energy_scale",
            Self::Latency => "latency_scale",
            Self::Leak => "leak_scale",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-instance multipliers, all starting at 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleFactors {
    pub area: f64,
    pub energy: f64,
    pub latency: f64,
    pub leak: f64,
}

impl Default for ScaleFactors {
    fn default() -> Self {
        Self {
            area: 1.0,
            energy: 1.0,
            latency: 1.0,
            leak: 1.0,
        }
    }
}

impl ScaleFactors {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Area => self.area,
            Dimension::Energy => self.energy,
            Dimension::Latency => self.latency,
            Dimension::Leak => self.leak,
        }
    }

    pub fn set(&mut self, dimension: Dimension, value: f64) {
        match dimension {
            Dimension::Area => self.area = value,
            Dimension::Energy => self.energy = value,
            Dimension::Latency => self.latency = value,
            Dimension::Leak => self.leak = value,
        }
    }

    pub fn multiply(&mut self, dimension: Dimension, factor: f64) {
        self.set(dimension, self.get(dimension) * factor);
    }
}

/// A scale function `f(target, default) -> multiplier`.
#[derive(Debug, Clone, Copy)]
pub enum ScaleFn {
    Linear,
    Reciprocal,
    Quadratic,
    /// `(target / default) ^ p`
    Power(f64),
    /// `n * log_b(n)` ratio with base `b`.
    NLogBase(f64),
    NLog2N,
    CactiDepth,
    NoScale,
    TechNodeArea,
    /// Supply voltage, or [`tech_node::DEFAULT_VDD`] when `None`.
    TechNodeEnergy(Option<f64>),
    TechNodeLatency,
    TechNodeLeak(Option<f64>),
    Custom(fn(f64, f64) -> f64),
}

impl ScaleFn {
    pub fn eval(&self, target: f64, default: f64) -> f64 {
        match *self {
            Self::Linear => functions::linear(target, default),
            Self::Reciprocal => functions::reciprocal(target, default),
            Self::Quadratic => functions::quadratic(target, default),
            Self::Power(p) => functions::power(target, default, p),
            Self::NLogBase(b) => functions::nlog_base(target, default, b),
            Self::NLog2N => functions::nlog2n(target, default),
            Self::CactiDepth => functions::cacti_depth(target, default),
            Self::NoScale => functions::noscale(target, default),
            Self::TechNodeArea => tech_node::area(target, default),
            Self::TechNodeEnergy(vdd) => tech_node::energy(target, default, vdd),
            Self::TechNodeLatency => tech_node::latency(target, default),
            Self::TechNodeLeak(vdd) => tech_node::leak(target, default, vdd),
            Self::Custom(f) => f(target, default),
        }
    }

    /// Rules scaling every dimension by technology node.
    pub fn tech_node_rules() -> [(Dimension, ScaleFn); 4] {
        [
            (Dimension::Area, Self::TechNodeArea),
            (Dimension::Energy, Self::TechNodeEnergy(None)),
            (Dimension::Latency, Self::TechNodeLatency),
            (Dimension::Leak, Self::TechNodeLeak(None)),
        ]
    }
}

/// Apply `rules` to `factors`. Returns the multiplier computed for each
/// rule, or the first dimension whose multiplier is not finite.
pub fn apply(
    factors: &mut ScaleFactors,
    target: f64,
    default: f64,
    rules: &[(Dimension, ScaleFn)],
) -> Result<Vec<(Dimension, f64)>, (Dimension, f64)> {
    let mut computed = Vec::with_capacity(rules.len());
    for (dimension, func) in rules {
        let multiplier = func.eval(target, default);
        if !multiplier.is_finite() {
            return Err((*dimension, multiplier));
        }
        computed.push((*dimension, multiplier));
    }
    for (dimension, multiplier) in &computed {
        factors.multiply(*dimension, *multiplier);
    }
    Ok(computed)
}
