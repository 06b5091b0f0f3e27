use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use metals_tracker_core::{
    errors::CoreError,
    models::{holding::NewHolding, metal::Metal},
};
use serde::Deserialize;
use uuid::Uuid;

use super::shared::{blocking, layout, render};
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use crate::views::{FormValues, HoldingFormPage};

/// Fields as submitted. Kept as text so a rejected form can be echoed back.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HoldingForm {
    pub description: String,
    pub metal: String,
    pub quantity: String,
    pub purchase_price: String,
}

impl HoldingForm {
    /// Parse and validate into a holding ready to store.
    pub fn parse(&self) -> Result<NewHolding, CoreError> {
        let metal: Metal = self.metal.parse()?;
        let quantity = parse_number("Quantity", &self.quantity)?;
        let purchase_price = parse_number("Purchase price", &self.purchase_price)?;
        NewHolding::new(self.description.as_str(), metal, quantity, purchase_price).validate()
    }

    fn values(&self) -> FormValues {
        FormValues {
            description: self.description.clone(),
            metal: self.metal.clone(),
            quantity: self.quantity.clone(),
            purchase_price: self.purchase_price.clone(),
        }
    }
}

fn parse_number(field: &str, raw: &str) -> Result<f64, CoreError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CoreError::ValidationError(format!("{field} must be a number")))
}

fn validation_message(error: &CoreError) -> String {
    match error {
        CoreError::ValidationError(message) => message.clone(),
        other => other.to_string(),
    }
}

async fn ensure_portfolio(state: &AppState, portfolio_id: Uuid) -> ApiResult<()> {
    blocking(state, move |tracker| tracker.get_portfolio(portfolio_id))
        .await?
        .map(|_| ())
        .ok_or(ApiError::NotFound)
}

/// Re-render the form with the submitted values and the reason it was rejected.
async fn rejected(
    state: &AppState,
    portfolio_id: Uuid,
    holding_id: Option<Uuid>,
    form: &HoldingForm,
    error: &CoreError,
) -> ApiResult<Response> {
    let layout = layout(state).await;
    let message = Some(validation_message(error));
    let page = match holding_id {
        Some(holding_id) => {
            HoldingFormPage::edit(layout, portfolio_id, holding_id, form.values(), message)
        }
        None => HoldingFormPage::add(layout, portfolio_id, form.values(), message),
    };
    Ok((StatusCode::UNPROCESSABLE_ENTITY, render(&page)?).into_response())
}

fn back_to_portfolio(portfolio_id: Uuid) -> Response {
    Redirect::to(&format!("/p/{portfolio_id}")).into_response()
}

async fn new_holding(
    State(state): State<Arc<AppState>>,
    Path(portfolio_id): Path<Uuid>,
) -> ApiResult<Html<String>> {
    ensure_portfolio(&state, portfolio_id).await?;
    let page = HoldingFormPage::add(layout(&state).await, portfolio_id, FormValues::default(), None);
    render(&page)
}

async fn create_holding(
    State(state): State<Arc<AppState>>,
    Path(portfolio_id): Path<Uuid>,
    Form(form): Form<HoldingForm>,
) -> ApiResult<Response> {
    ensure_portfolio(&state, portfolio_id).await?;
    let holding = match form.parse() {
        Ok(holding) => holding,
        Err(e) => return rejected(&state, portfolio_id, None, &form, &e).await,
    };

    let created = blocking(&state, move |tracker| {
        tracker.add_holding(portfolio_id, &holding)
    })
    .await?;
    tracing::info!(%portfolio_id, holding_id = %created.id, "Added holding");
    Ok(back_to_portfolio(portfolio_id))
}

async fn edit_holding(
    State(state): State<Arc<AppState>>,
    Path((portfolio_id, holding_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Html<String>> {
    let holding = blocking(&state, move |tracker| {
        tracker.get_holding(portfolio_id, holding_id)
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    let page = HoldingFormPage::edit(
        layout(&state).await,
        portfolio_id,
        holding_id,
        FormValues::from(&holding),
        None,
    );
    render(&page)
}

async fn update_holding(
    State(state): State<Arc<AppState>>,
    Path((portfolio_id, holding_id)): Path<(Uuid, Uuid)>,
    Form(form): Form<HoldingForm>,
) -> ApiResult<Response> {
    blocking(&state, move |tracker| {
        tracker.get_holding(portfolio_id, holding_id)
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    let holding = match form.parse() {
        Ok(holding) => holding,
        Err(e) => return rejected(&state, portfolio_id, Some(holding_id), &form, &e).await,
    };

    blocking(&state, move |tracker| {
        tracker.update_holding(portfolio_id, holding_id, &holding)
    })
    .await?;
    tracing::info!(%portfolio_id, %holding_id, "Updated holding");
    Ok(back_to_portfolio(portfolio_id))
}

async fn delete_holding(
    State(state): State<Arc<AppState>>,
    Path((portfolio_id, holding_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Response> {
    blocking(&state, move |tracker| {
        tracker.remove_holding(portfolio_id, holding_id)
    })
    .await?;
    tracing::info!(%portfolio_id, %holding_id, "Removed holding");
    Ok(back_to_portfolio(portfolio_id))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/p/{portfolio_id}/holdings/new", get(new_holding))
        .route("/p/{portfolio_id}/holdings", post(create_holding))
        .route("/p/{portfolio_id}/holdings/{holding_id}/edit", get(edit_holding))
        .route("/p/{portfolio_id}/holdings/{holding_id}", post(update_holding))
        .route(
            "/p/{portfolio_id}/holdings/{holding_id}/delete",
            post(delete_holding),
        )
}
