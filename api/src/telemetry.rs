//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use us_shared::config::{LogFormat, LoggingConfig};

/// Install the global subscriber
///
/// The filter directive comes from `LoggingConfig::level`; an unparsable
/// directive falls back to `info` rather than silencing the process.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = match config.format {
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}
