//! Cost-model errors raised while constructing or evaluating a model.

use super::error_code::{self, HwcErrorCode};

/// Errors that can occur while a single cost model is built or evaluated.
///
/// Most variants mean "this model cannot answer this query" and let the
/// resolver fall through to the next candidate. The variants reported by
/// [`ModelError::is_fatal`] are plugin bugs and abort resolution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// The model vetoed the query, e.g. a parameter outside its validated range.
    #[error("{0}")]
    Declined(String),

    #[error("Argument for {context} is missing: {name}")]
    MissingArgument { context: String, name: String },

    #[error("Invalid value for {context}: {message}")]
    InvalidArgument { context: String, message: String },

    /// Supplied arguments don't satisfy any signature of the requested action.
    #[error("{0}")]
    ArgumentMismatch(String),

    #[error("No action with name {action} found in {model}. Actions supported: {supported}")]
    UnknownAction {
        model: String,
        action: String,
        supported: String,
    },

    #[error("Scaling {key} for {model} produced a non-finite factor: {message}")]
    Scaling {
        model: String,
        key: String,
        message: String,
    },

    #[error("{model}.{action} returned no energy/latency, but {model} has no subcomponents. Leaf models must return an (energy, latency) pair")]
    MissingReturn { model: String, action: String },

    #[error("{model} has no attribute {attribute}. Ensure that attributes referenced as nominal bits per action are defined by the model")]
    MissingAttribute { model: String, attribute: String },

    #[error("Call depth {depth} exceeds the limit of {limit} while evaluating {model}")]
    RecursionLimit {
        model: String,
        depth: usize,
        limit: usize,
    },

    #[error("Usage error in {model}: {message}")]
    Usage { model: String, message: String },
}

impl ModelError {
    /// Shorthand for [`ModelError::Declined`].
    pub fn declined(reason: impl Into<String>) -> Self {
        Self::Declined(reason.into())
    }

    /// Shorthand for [`ModelError::Usage`].
    pub fn usage(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Usage {
            model: model.into(),
            message: message.into(),
        }
    }

    /// Fatal errors indicate a malformed plugin and are never skipped over.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingReturn { .. }
                | Self::MissingAttribute { .. }
                | Self::RecursionLimit { .. }
                | Self::Usage { .. }
        )
    }
}

impl HwcErrorCode for ModelError {
    fn error_code(&self) -> &'static str {
        if self.is_fatal() {
            error_code::USAGE_ERROR
        } else {
            error_code::MODEL_ERROR
        }
    }
}
