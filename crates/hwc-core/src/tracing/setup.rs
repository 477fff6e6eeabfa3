//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::{DEFAULT_LOG_FILTER, LOG_ENV_VAR};

static INIT: Once = Once::new();

/// Initialize the hwc tracing/logging system.
///
/// Reads the `HWC_LOG` environment variable for per-module log levels.
/// Format: `HWC_LOG=hwc_engine::resolver=debug,hwc_engine::aggregation=trace`
///
/// Falls back to `hwc=info` if `HWC_LOG` is not set or is invalid.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        // Another subscriber may already be installed by the host application.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
