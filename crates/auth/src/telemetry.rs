use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

use crate::config::AuthConfig;

/// Installs the global tracing subscriber. `RUST_LOG` wins over the
/// configured filter when set.
pub fn init(config: &AuthConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .map_err(|error| anyhow!("invalid log filter '{}': {error}", config.log_filter))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let result = if config.log_json { builder.json().try_init() } else { builder.try_init() };

    result.map_err(|error| anyhow!("failed to install tracing subscriber: {error}"))
}
