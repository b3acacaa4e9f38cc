//! Logging configuration using tracing
//!
//! Structured logging to stderr with support for the RUST_LOG environment
//! variable. Stdout is never used: on receive it carries the rewritten
//! message.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber
///
/// Filtering honors RUST_LOG when set; otherwise the level defaults to
/// "warn" for quiet operation as an MTA transport, or "debug" when the
/// `--debug` flag is given.
///
/// # Errors
/// Returns an error if the subscriber has already been initialized
pub fn init(debug: bool) -> crate::Result<()> {
    let default_level = if debug { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| crate::Error::Other(format!("Failed to initialize tracing: {}", e)))?;

    Ok(())
}

/// Initialize logging for tests (no-op if already initialized)
pub fn init_test() {
    let _ = init(false);
}
