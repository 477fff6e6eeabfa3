//! Component requests and the selection hints they carry.

use std::collections::BTreeSet;
use std::fmt;

use hwc_core::constants::{
    KEY_ESTIMATOR, KEY_MIN_ACCURACY, KEY_MIN_PRIORITY, KEY_MODEL, KEY_N_INSTANCES,
    SELECTION_ONLY_KEYS,
};
use hwc_core::errors::ModelError;
use serde::{Deserialize, Serialize};

use crate::value::Params;

/// A request for one component: its name, its attributes, and optionally
/// one action to evaluate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub component_name: String,
    #[serde(default)]
    pub attributes: Params,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub arguments: Params,
    #[serde(default)]
    pub required_actions: BTreeSet<String>,
}

impl Query {
    pub fn new(component_name: impl Into<String>, attributes: Params) -> Self {
        Self {
            component_name: component_name.into(),
            attributes,
            ..Default::default()
        }
    }

    pub fn with_action(mut self, action: impl Into<String>, arguments: Params) -> Self {
        self.action = Some(action.into());
        self.arguments = arguments;
        self
    }

    /// Require the chosen model to support every action in `actions`.
    pub fn requiring<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_actions
            .extend(actions.into_iter().map(Into::into));
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Split selection hints off the query. The returned query no longer
    /// carries any selection-only key in its attributes or arguments.
    pub fn normalize(&self) -> Result<(Query, Selection), ModelError> {
        let selection = Selection::extract(&self.attributes)?;
        let mut stripped = self.clone();
        for key in SELECTION_ONLY_KEYS {
            stripped.attributes.remove(key);
            stripped.arguments.remove(key);
        }
        Ok((stripped, selection))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.component_name, self.attributes)?;
        if let Some(action) = &self.action {
            write!(f, ".{}({})", action, self.arguments)?;
        }
        Ok(())
    }
}

/// Selection hints carried in a query's attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// A model the caller insists on, compared case-insensitively.
    pub model: Option<String>,
    pub min_priority: Option<f64>,
    pub n_instances: f64,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            model: None,
            min_priority: None,
            n_instances: 1.0,
        }
    }
}

impl Selection {
    fn extract(attributes: &Params) -> Result<Self, ModelError> {
        let model = attributes
            .get(KEY_MODEL)
            .or_else(|| attributes.get(KEY_ESTIMATOR))
            .map(ToString::to_string);
        let min_priority = attributes
            .get(KEY_MIN_PRIORITY)
            .map(|v| v.as_f64(KEY_MIN_PRIORITY))
            .or_else(|| {
                attributes
                    .get(KEY_MIN_ACCURACY)
                    .map(|v| v.as_f64(KEY_MIN_ACCURACY))
            })
            .transpose()?;
        let n_instances = attributes
            .get(KEY_N_INSTANCES)
            .map(|v| v.as_f64(KEY_N_INSTANCES))
            .transpose()?
            .unwrap_or(1.0);
        Ok(Self {
            model,
            min_priority,
            n_instances,
        })
    }

    /// Messages explaining why `model` (with `priority`) is not acceptable.
    /// Empty when it is.
    pub fn rejections(&self, model: &str, priority: f64) -> Vec<String> {
        let mut reasons = Vec::new();
        if let Some(wanted) = &self.model {
            if !wanted.eq_ignore_ascii_case(model) {
                reasons.push(format!("Model {model} did not match requested model {wanted}"));
            }
        }
        if let Some(min) = self.min_priority {
            if priority < min {
                reasons.push(format!("Model {model} did not meet min_priority {min}"));
            }
        }
        reasons
    }
}
