//! Registration errors for malformed model descriptors.

use super::error_code::{self, HwcErrorCode};

/// Errors raised when a model type is added to the candidate pool.
/// These are usage errors: a malformed plugin is rejected up front.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("Model {model} must declare at least one component name")]
    NoComponentNames { model: String },

    #[error("Model {model} has an invalid component name {name:?}: {reason}")]
    InvalidComponentName {
        model: String,
        name: String,
        reason: String,
    },

    #[error("Model {model} must declare a priority between 0 and 1")]
    MissingPriority { model: String },

    #[error("Model {model} priority must be a number between 0 and 1, got {priority}")]
    InvalidPriority { model: String, priority: f64 },

    #[error("Model {model} declares parameter {param} twice in {function}")]
    DuplicateParameter {
        model: String,
        function: String,
        param: String,
    },

    #[error("Model {model} declares action {action} twice")]
    DuplicateAction { model: String, action: String },

    #[error("Model {model} may not declare action {action}: the name is reserved")]
    ReservedAction { model: String, action: String },
}

impl HwcErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        error_code::REGISTRY_ERROR
    }
}
