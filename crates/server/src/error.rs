use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use metals_tracker_core::errors::CoreError;
use thiserror::Error;

use crate::views::{ErrorPage, Layout, NotFoundPage};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("Not Found")]
    NotFound,
    #[error("Unable to fetch current metal prices: {0}")]
    PricesUnavailable(String),
    #[error("{0}")]
    Template(#[from] askama::Error),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Core(CoreError::ValidationError(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Core(CoreError::PriceNotAvailable(_) | CoreError::PricesUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::PricesUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Template(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status == StatusCode::NOT_FOUND {
            return not_found_page();
        }

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{self}");
        }

        let message = match &self {
            ApiError::Core(CoreError::PricesUnavailable(reason)) => {
                format!("Unable to fetch current metal prices: {reason}")
            }
            _ => self.to_string(),
        };

        let page = ErrorPage {
            layout: Layout::bare(),
            status: status.as_u16(),
            message,
        };
        match page.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {e}");
                (status, page.message).into_response()
            }
        }
    }
}

/// The 404 page, also used as the router fallback.
pub fn not_found_page() -> Response {
    let page = NotFoundPage {
        layout: Layout::bare(),
    };
    match page.render() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
