mod holdings;
mod home;
mod portfolios;
mod shared;

pub use holdings::HoldingForm;

use std::sync::Arc;

use axum::{response::Response, Router};
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::error::not_found_page;
use crate::main_lib::AppState;

async fn fallback() -> Response {
    not_found_page()
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    Router::new()
        .merge(home::router())
        .merge(portfolios::router())
        .merge(holdings::router())
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .fallback(fallback)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.request_timeout))
}
