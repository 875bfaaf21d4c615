use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::model::ErrorResponse;

/// Errors reported to API clients
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body could not be decoded, with the decoder's reason
    #[error("Invalid data format")]
    InvalidBody(String),
    /// Query string could not be decoded, with the decoder's reason
    #[error("Invalid query string")]
    InvalidQuery(String),
    #[error("Token is required")]
    MissingToken,
    #[error("Token query param is required")]
    MissingTokenParam,
    /// A handler panicked
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_)
            | ApiError::InvalidQuery(_)
            | ApiError::MissingToken
            | ApiError::MissingTokenParam => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
