use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid GPX: {0}")]
    InvalidGpx(String),
    #[error("Invalid TCX: {0}")]
    InvalidTcx(String),
    #[error("Invalid FIT: {0}")]
    InvalidFit(String),
    #[error("No track points found in file")]
    EmptyFile,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("Could not read this file: {0}")]
    ParseFailure(#[from] ParseError),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("Activity not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Import(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
