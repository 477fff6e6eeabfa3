//! Shared constants for the hwc engine.

/// hwc version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default ceiling on call depth through subcomponent trees and actions.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default minimum priority a candidate must meet (no threshold).
pub const DEFAULT_MIN_PRIORITY: f64 = 0.0;

/// Default message-log channel the resolver reports under.
pub const DEFAULT_LOG_CHANNEL: &str = "hwc";

/// Default number of undrained messages the resolver keeps per channel.
pub const DEFAULT_LOG_CAPACITY: usize = 1024;

/// Default tracing filter when `HWC_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "hwc=info";

/// Environment variable read by `init_tracing`.
pub const LOG_ENV_VAR: &str = "HWC_LOG";

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "hwc.toml";

// ---- Query keys ----

/// Attribute naming the model a caller insists on.
pub const KEY_MODEL: &str = "model";

/// Older spelling of [`KEY_MODEL`].
pub const KEY_ESTIMATOR: &str = "estimator";

/// Attribute carrying the minimum acceptable priority.
pub const KEY_MIN_PRIORITY: &str = "min_priority";

/// Older spelling of [`KEY_MIN_PRIORITY`].
pub const KEY_MIN_ACCURACY: &str = "min_accuracy";

/// Attribute carrying the instance-count multiplier.
pub const KEY_N_INSTANCES: &str = "n_instances";

/// Action argument requesting bit-width scaling.
pub const KEY_BITS_PER_ACTION: &str = "bits_per_action";

/// Argument of the built-in leak action.
pub const KEY_TIME_PERIOD: &str = "time_period";

/// Name of the built-in leakage action every model supports.
pub const LEAK_ACTION: &str = "leak";

/// Keys that steer selection or override results. They are removed from
/// attributes and arguments before constructors or actions see them.
pub const SELECTION_ONLY_KEYS: [&str; 13] = [
    KEY_MODEL,
    KEY_ESTIMATOR,
    KEY_MIN_PRIORITY,
    KEY_MIN_ACCURACY,
    KEY_N_INSTANCES,
    "area",
    "energy",
    "latency",
    "leak_power",
    "area_scale",
    "energy_scale",
    "latency_scale",
    "leak_scale",
];
