use crate::error::SmokeError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber: `RUST_LOG` if set, else `info`
/// (`debug` with `--verbose`), compact lines on stderr.
pub fn init_logging(verbose: bool) -> Result<(), SmokeError> {
    let default_level = if verbose { "debug" } else { "info" };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| SmokeError::config(format!("Failed to create log filter: {}", e)))?;

    // stdout carries the report
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| SmokeError::config(format!("Failed to initialize logging: {}", e)))
}
