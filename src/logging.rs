use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("tourai={level},tower_http={level},warn", level = config.level))
    });

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .try_init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().with_target(false).compact())
            .try_init(),
    };

    result.map_err(|e| anyhow!("Failed to initialise logging: {e}"))
}
