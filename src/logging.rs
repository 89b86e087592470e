//! Logging setup
//!
//! Logs go to stderr so stdout stays free for the balances CSV.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `level`. Calling this more than once is a
/// no-op after the first call.
pub fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if json {
        let layer = fmt::layer()
            .json()
            .with_target(true)
            .with_thread_names(true)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()
    } else {
        let layer = fmt::layer()
            .with_target(false)
            .with_thread_names(true)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
