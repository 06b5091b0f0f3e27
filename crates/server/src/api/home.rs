use std::sync::Arc;

use axum::{extract::State, response::Html, routing::get, Router};

use super::shared::{layout, render};
use crate::error::ApiResult;
use crate::main_lib::AppState;
use crate::views::HomePage;

async fn home_index(State(state): State<Arc<AppState>>) -> ApiResult<Html<String>> {
    render(&HomePage {
        layout: layout(&state).await,
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(home_index))
}
