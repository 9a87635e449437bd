//! Tracing subscriber setup for the server binary.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when nothing else is configured.
pub const DEFAULT_FILTER: &str = "info,tower_http=warn";

/// Picks the active filter: an explicit override wins, then `RUST_LOG`,
/// then the configured fallback.
pub fn resolve_filter(explicit: Option<&str>, configured: &str) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var("RUST_LOG").ok())
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| {
            if configured.trim().is_empty() {
                DEFAULT_FILTER.to_string()
            } else {
                configured.to_string()
            }
        })
}

/// Installs a formatted `tracing` subscriber with the given filter.
pub fn init_tracing(filter: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_new(filter)?;
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}
