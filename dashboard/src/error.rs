use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::html;
use thiserror::Error;
use tracing::error;

use crate::api::ApiError;
use crate::styles::Global;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{0} not found")]
    NotFound(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Api(ApiError::NotFound { .. }) | AppError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::Api(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match status {
            StatusCode::NOT_FOUND => "Not found".to_owned(),
            _ => {
                error!("Request failed: {self:?}");
                format!("The garage API could not be reached: {self}")
            }
        };

        let body = html! {
            div.(Global::ERROR_PAGE) {
                h2 { (status.as_u16()) }
                p { (message) }
                a href="/" { "back to garage" }
            }
        };
        (status, body).into_response()
    }
}
