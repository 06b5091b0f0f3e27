use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    routing::{get, post},
    Router,
};
use metals_tracker_core::errors::CoreError;
use uuid::Uuid;

use super::shared::{blocking, render};
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use crate::views::{Layout, PortfolioPage};

async fn create_portfolio(State(state): State<Arc<AppState>>) -> ApiResult<Redirect> {
    let portfolio = blocking(&state, |tracker| tracker.create_portfolio()).await?;
    tracing::info!(portfolio_id = %portfolio.id, "Created portfolio");
    Ok(Redirect::to(&format!("/p/{}", portfolio.id)))
}

async fn show_portfolio(
    State(state): State<Arc<AppState>>,
    Path(portfolio_id): Path<Uuid>,
) -> ApiResult<Html<String>> {
    let portfolio = blocking(&state, move |tracker| tracker.get_portfolio(portfolio_id))
        .await?
        .ok_or(ApiError::NotFound)?;

    let prices = state
        .tracker
        .current_prices()
        .await
        .map_err(|e| ApiError::PricesUnavailable(e.to_string()))?;

    let overview = state
        .tracker
        .calculate_overview(&portfolio, &prices)
        .map_err(|e| match e {
            CoreError::PriceNotAvailable(_) => ApiError::PricesUnavailable(e.to_string()),
            other => ApiError::from(other),
        })?;

    let layout = Layout::new(
        state.dev_mode,
        Some(&prices),
        state.tracker.price_cache().last_updated().await,
    );
    render(&PortfolioPage::new(layout, portfolio.id, &overview))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/p", post(create_portfolio))
        .route("/p/", post(create_portfolio))
        .route("/p/{portfolio_id}", get(show_portfolio))
}
