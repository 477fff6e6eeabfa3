//! Top-level hwc configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{LoggingConfig, ResolverConfig};
use crate::constants::PROJECT_CONFIG_FILE;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`HWC_*`)
/// 3. Project config (`hwc.toml` in the project root)
/// 4. User config (`~/.hwc/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HwcConfig {
    pub resolver: ResolverConfig,
    pub logging: LoggingConfig,
}

/// Programmatic overrides that win over every file and environment layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_depth: Option<usize>,
    pub min_priority: Option<f64>,
    pub suggest_relaxed_names: Option<bool>,
    pub log_channel: Option<String>,
}

impl HwcConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        ::tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): explicit overrides
        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &HwcConfig) -> Result<(), ConfigError> {
        if config.resolver.max_depth == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "resolver.max_depth".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(min_priority) = config.resolver.min_priority {
            if !(0.0..=1.0).contains(&min_priority) {
                return Err(ConfigError::ValidationFailed {
                    field: "resolver.min_priority".to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }
        if let Some(ref channel) = config.logging.channel {
            if channel.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "logging.channel".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if config.logging.capacity == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "logging.capacity".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.hwc/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".hwc").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut HwcConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: HwcConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut HwcConfig, other: &HwcConfig) {
        if other.resolver.max_depth.is_some() {
            base.resolver.max_depth = other.resolver.max_depth;
        }
        if other.resolver.min_priority.is_some() {
            base.resolver.min_priority = other.resolver.min_priority;
        }
        if other.resolver.suggest_relaxed_names.is_some() {
            base.resolver.suggest_relaxed_names = other.resolver.suggest_relaxed_names;
        }
        if other.logging.channel.is_some() {
            base.logging.channel = other.logging.channel.clone();
        }
        if other.logging.mirror_to_tracing.is_some() {
            base.logging.mirror_to_tracing = other.logging.mirror_to_tracing;
        }
        if other.logging.capacity.is_some() {
            base.logging.capacity = other.logging.capacity;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `HWC_RESOLVER_MAX_DEPTH`, `HWC_LOG_CHANNEL`, etc.
    /// Unparseable values are ignored.
    fn apply_env_overrides(config: &mut HwcConfig) {
        if let Ok(val) = std::env::var("HWC_RESOLVER_MAX_DEPTH") {
            if let Ok(v) = val.parse::<usize>() {
                config.resolver.max_depth = Some(v);
            }
        }
        if let Ok(val) = std::env::var("HWC_RESOLVER_MIN_PRIORITY") {
            if let Ok(v) = val.parse::<f64>() {
                config.resolver.min_priority = Some(v);
            }
        }
        if let Ok(val) = std::env::var("HWC_RESOLVER_SUGGEST_RELAXED") {
            if let Ok(v) = val.parse::<bool>() {
                config.resolver.suggest_relaxed_names = Some(v);
            }
        }
        if let Ok(val) = std::env::var("HWC_LOG_CHANNEL") {
            config.logging.channel = Some(val);
        }
    }

    /// Apply explicit overrides (highest priority).
    fn apply_overrides(config: &mut HwcConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.max_depth {
            config.resolver.max_depth = Some(v);
        }
        if let Some(v) = overrides.min_priority {
            config.resolver.min_priority = Some(v);
        }
        if let Some(v) = overrides.suggest_relaxed_names {
            config.resolver.suggest_relaxed_names = Some(v);
        }
        if let Some(ref v) = overrides.log_channel {
            config.logging.channel = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
