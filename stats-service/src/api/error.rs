use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::params::ValidationError;
use crate::sources::SourceError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("No data for {0}")]
    NotFound(String),
    #[error("Record source error: {0}")]
    Source(#[from] SourceError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Source(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Validation(e) => e.to_string(),
            AppError::NotFound(date) => format!("no data for {date}"),
            // The cause is logged by the handler, not sent to the client.
            AppError::Source(_) => "electricity data is temporarily unavailable".to_string(),
        };
        let body = Json(serde_json::json!({ "error": message }));
        (self.status(), body).into_response()
    }
}
