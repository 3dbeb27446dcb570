//! Logging setup for hosts that do not install their own subscriber.
//!
//! The crate logs through `tracing`; nothing is printed until a subscriber
//! is installed. `RUST_LOG` takes precedence over the default filter.

use tracing_subscriber::EnvFilter;

/// Default filter used by [`init_logging`] callers that have no preference.
pub const DEFAULT_FILTER: &str = "imagestag_fill=info";

/// Install a formatted stdout subscriber.
///
/// # Returns
/// `false` if a global subscriber was already set; it is left untouched.
pub fn init_logging(default_filter: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
