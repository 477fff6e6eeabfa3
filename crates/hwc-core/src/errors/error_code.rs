//! HwcErrorCode trait for stable, machine-readable error codes.

/// Trait for mapping hwc errors to stable error code strings.
/// Every error enum implements this so callers embedding the engine can
/// branch on a code instead of parsing messages.
pub trait HwcErrorCode {
    /// Returns the error code string (e.g., "RESOLUTION_FAILED").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const MODEL_ERROR: &str = "MODEL_ERROR";
pub const USAGE_ERROR: &str = "USAGE_ERROR";
pub const REGISTRY_ERROR: &str = "REGISTRY_ERROR";
pub const RESOLUTION_FAILED: &str = "RESOLUTION_FAILED";
pub const NO_ELIGIBLE_MODELS: &str = "NO_ELIGIBLE_MODELS";
pub const NO_MODELS_REGISTERED: &str = "NO_MODELS_REGISTERED";
