//! Message log configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LOG_CAPACITY, DEFAULT_LOG_CHANNEL};

/// Configuration for the resolver's message log.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Channel the resolver appends summaries to. Default: "hwc".
    pub channel: Option<String>,
    /// Mirror every appended message as a tracing event. Default: true.
    pub mirror_to_tracing: Option<bool>,
    /// Undrained messages kept per channel before the oldest are dropped. Default: 1024.
    pub capacity: Option<usize>,
}

impl LoggingConfig {
    /// Returns the effective channel name, defaulting to "hwc".
    pub fn effective_channel(&self) -> &str {
        self.channel.as_deref().unwrap_or(DEFAULT_LOG_CHANNEL)
    }

    /// Returns whether messages are mirrored to tracing, defaulting to true.
    pub fn effective_mirror_to_tracing(&self) -> bool {
        self.mirror_to_tracing.unwrap_or(true)
    }

    /// Returns the per-channel capacity, defaulting to 1024.
    pub fn effective_capacity(&self) -> usize {
        self.capacity.unwrap_or(DEFAULT_LOG_CAPACITY)
    }
}
