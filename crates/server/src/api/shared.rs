use askama::Template;
use axum::response::Html;
use metals_tracker_core::{errors::CoreError, MetalsTracker};

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use crate::views::Layout;

/// Run a synchronous tracker call on the blocking pool.
pub async fn blocking<T, F>(state: &AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&MetalsTracker) -> Result<T, CoreError> + Send + 'static,
    T: Send + 'static,
{
    let tracker = state.tracker.clone();
    tokio::task::spawn_blocking(move || f(&tracker))
        .await
        .map_err(|e| ApiError::Internal(format!("Storage task failed: {e}")))?
        .map_err(ApiError::from)
}

/// Header data with whatever prices are available. A failed price lookup
/// leaves the price bar empty instead of failing the page.
pub async fn layout(state: &AppState) -> Layout {
    let cache = state.tracker.price_cache();
    let prices = match cache.get_prices().await {
        Ok(prices) => Some(prices),
        Err(e) => {
            tracing::warn!("Prices unavailable for page header: {e}");
            None
        }
    };
    Layout::new(state.dev_mode, prices.as_ref(), cache.last_updated().await)
}

pub fn render<T: Template>(page: &T) -> ApiResult<Html<String>> {
    Ok(Html(page.render()?))
}
