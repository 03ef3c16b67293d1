use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadlensError {
    /// The request carried missing or undecodable image data.
    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("OCR processing error: {0}")]
    Engine(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error payload carried on every non-2xx response.
///
/// ```json
/// { "detail": "Invalid image data: ..." }
/// ```
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for ReadlensError {
    fn into_response(self) -> Response {
        let status = match &self {
            ReadlensError::InvalidImage(_) | ReadlensError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ReadlensError::Engine(_) | ReadlensError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(ErrorBody {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ReadlensError>;
