use metals_tracker_server::{app_router, build_state, init_tracing, main_lib::shutdown_signal, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();
    let state = build_state(&config)?;

    let cache = state.tracker.price_cache().clone();
    cache.start_background_refresh();

    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache.stop_background_refresh().await;
    tracing::info!("Server stopped");
    Ok(())
}
