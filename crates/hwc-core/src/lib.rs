//! Core types, errors, config, tracing, message log, and constants for hwc.
//!
//! The engine crate builds on top of this: every error enum it returns lives
//! in [`errors`], and every tunable it reads comes from [`config`].

pub mod config;
pub mod constants;
pub mod errors;
pub mod messages;
pub mod tracing;
pub mod types;

pub use config::HwcConfig;
pub use errors::{ConfigError, HwcErrorCode, ModelError, RegistryError, ResolveError};
pub use messages::{MessageLog, MessageSink};
