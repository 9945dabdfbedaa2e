//! Structured logging initialization
//!
//! Provides consistent logging initialization across all setup tools.

use crate::config::ConfigExt;
use tracing::span::EnteredSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Guard that keeps the component span entered.
/// Hold it until the end of main.
pub struct LogGuard {
    _span: EnteredSpan,
}

/// Initialize structured logging for a component.
///
/// `RUST_LOG` narrows or widens the default `info` level. `LOG_FORMAT=json`
/// switches to one JSON object per line.
///
/// # Example
/// ```ignore
/// let _guard = init_logging("setup-database");
/// info!("Starting up...");
/// ```
pub fn init_logging(component: &str) -> LogGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = String::env_or("LOG_FORMAT", "text").eq_ignore_ascii_case("json");

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(fmt::layer().json().with_target(false))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }

    let span = tracing::info_span!("component", name = %component).entered();
    LogGuard { _span: span }
}
