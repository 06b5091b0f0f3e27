use std::sync::Arc;

use metals_tracker_core::{providers::registry::PriceProviderRegistry, MetalsTracker};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub tracker: Arc<MetalsTracker>,
    pub dev_mode: bool,
}

/// Install the global subscriber. `log` records from the core crate are
/// forwarded into it.
///
/// Filter: `RUST_LOG`, else `LOG_LEVEL`, else `info`. `LOG_FORMAT=json`
/// switches to one JSON object per line.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
            EnvFilter::try_new(level.to_lowercase())
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let (json_layer, text_layer) = if json {
        (Some(fmt::layer().json().with_current_span(false)), None)
    } else {
        (None, Some(fmt::layer().with_target(true)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

/// Open the database and wire the tracker with the default providers.
pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let registry = PriceProviderRegistry::new_with_defaults(&config.api_keys());
    build_state_with_registry(config, registry)
}

pub fn build_state_with_registry(
    config: &Config,
    registry: PriceProviderRegistry,
) -> anyhow::Result<Arc<AppState>> {
    tracing::info!(
        "Price providers: {}",
        registry.provider_names().join(", ")
    );
    let tracker = MetalsTracker::open(&config.database_url, registry, config.refresh_interval)?;
    tracing::info!("Database in use: {}", config.database_url);

    Ok(Arc::new(AppState {
        tracker: Arc::new(tracker),
        dev_mode: config.dev_mode,
    }))
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
