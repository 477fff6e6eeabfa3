//! Error handling for hwc.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod model_error;
pub mod registry_error;
pub mod resolve_error;

pub use config_error::ConfigError;
pub use error_code::HwcErrorCode;
pub use model_error::ModelError;
pub use registry_error::RegistryError;
pub use resolve_error::{FailedAttempt, InitFailure, ResolveError};
