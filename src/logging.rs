// src/logging.rs
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Settings;

/// Install the global subscriber.
///   - `RUST_LOG` wins when set
///   - otherwise debug for this crate when `DEBUG` is on, info elsewhere
///   - JSON lines in production, compact text everywhere else
///
/// `settings` is `None` when configuration itself failed to load.
pub fn init(settings: Option<&Settings>) {
    let debug_on = settings.map(|s| s.debug).unwrap_or(false);
    let json = settings.map(|s| s.is_production()).unwrap_or(false);

    let default_directive = if debug_on {
        "crypto_news_pipeline=debug,info"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(filter);
    let res = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    if res.is_ok() {
        tracing::info!(debug = debug_on, json, "logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        init(None);
        init(None);
        tracing::info!("still logging");
    }
}
