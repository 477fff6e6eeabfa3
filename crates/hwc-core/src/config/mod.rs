//! Configuration system for hwc.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod hwc_config;
pub mod logging_config;
pub mod resolver_config;

pub use hwc_config::{ConfigOverrides, HwcConfig};
pub use logging_config::LoggingConfig;
pub use resolver_config::ResolverConfig;
