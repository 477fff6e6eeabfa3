//! Resolver configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_DEPTH, DEFAULT_MIN_PRIORITY};

/// Configuration for candidate resolution and aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ResolverConfig {
    /// Ceiling on call depth through subcomponents. Default: 64.
    pub max_depth: Option<usize>,
    /// Minimum priority applied when a query sets none. Default: 0.0.
    pub min_priority: Option<f64>,
    /// Offer underscore-insensitive "did you mean" hints. Default: true.
    pub suggest_relaxed_names: Option<bool>,
}

impl ResolverConfig {
    /// Returns the effective depth ceiling, defaulting to 64.
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    /// Returns the effective minimum priority, defaulting to 0.0.
    pub fn effective_min_priority(&self) -> f64 {
        self.min_priority.unwrap_or(DEFAULT_MIN_PRIORITY)
    }

    /// Returns whether relaxed-name hints are produced, defaulting to true.
    pub fn effective_suggest_relaxed_names(&self) -> bool {
        self.suggest_relaxed_names.unwrap_or(true)
    }
}
