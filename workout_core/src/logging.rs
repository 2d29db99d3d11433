//! Logging setup for the wkplan binary.
//!
//! Events go to stderr so that JSON written to stdout stays parseable.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter for a run, before RUST_LOG is consulted
pub fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
pub fn init(verbose: bool) {
    init_with_level(default_level(verbose))
}

/// Install the global subscriber with an explicit fallback level
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Capture logs in test output; safe to call more than once
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
