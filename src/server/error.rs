//! HTTP mapping for service errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::SvrlabError;

use super::response::ApiResponse;

/// Wrapper turning a core error into the HTTP response envelope
#[derive(Debug)]
pub struct ApiError(pub SvrlabError);

impl From<SvrlabError> for ApiError {
    fn from(err: SvrlabError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;

        let (status, message) = match &err {
            SvrlabError::UnsupportedFormat(_) => (StatusCode::BAD_REQUEST, "Invalid file format"),
            SvrlabError::EmptyDataset => (StatusCode::BAD_REQUEST, "Empty dataset"),
            SvrlabError::ParseError(_) => (StatusCode::BAD_REQUEST, "Failed to process file"),
            SvrlabError::ValidationError { .. } => (StatusCode::BAD_REQUEST, "Invalid parameters"),
            SvrlabError::InsufficientData(_) => (StatusCode::BAD_REQUEST, "Insufficient data"),
            SvrlabError::PayloadTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "File too large")
            }
            SvrlabError::ModelNotFitted
            | SvrlabError::PlotError(_)
            | SvrlabError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to train model")
            }
        };

        // Only client errors expose their detail; internal failures are
        // logged and reported generically.
        let detail = if err.is_client_error() {
            err.to_string()
        } else {
            tracing::error!(detail = %err, "Internal server error");
            "An internal error occurred".to_string()
        };

        let body = Json(ApiResponse::failure(message, detail));
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
