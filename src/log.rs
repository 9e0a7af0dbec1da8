use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::config::DEFAULT_LOG_FILTER;

/// Install the global tracing subscriber.
///
/// Diagnostics go to stderr so that stdout only carries the package report.
pub fn init() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    // Use RUST_LOG if set, otherwise only warnings and errors
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
