use tracing_subscriber::EnvFilter;

use crate::config::TraceConfig;

/// Install the global `tracing` subscriber used by [`crate::TracingSink`].
///
/// `RUST_LOG` wins when set. Otherwise the level follows the `debug` flag
/// of the trace configuration.
pub fn init_tracing(config: &TraceConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(if config.debug { "debug" } else { "info" })
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(config.color)
        .try_init()
}
