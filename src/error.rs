//! Error types for the svrlab service

use thiserror::Error;

/// Result type alias for svrlab operations
pub type Result<T> = std::result::Result<T, SvrlabError>;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum SvrlabError {
    #[error("Unsupported file format: '{0}'. Only csv, xlsx and xls files are accepted")]
    UnsupportedFormat(String),

    #[error("The uploaded dataset is empty")]
    EmptyDataset,

    #[error("Failed to parse file: {0}")]
    ParseError(String),

    #[error("Invalid parameter '{field}': {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Payload too large: {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Plot rendering failed: {0}")]
    PlotError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SvrlabError {
    /// Shorthand for a validation failure naming the offending field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SvrlabError::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether the failure was caused by the request rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SvrlabError::UnsupportedFormat(_)
                | SvrlabError::EmptyDataset
                | SvrlabError::ParseError(_)
                | SvrlabError::ValidationError { .. }
                | SvrlabError::InsufficientData(_)
                | SvrlabError::PayloadTooLarge { .. }
        )
    }
}

impl From<polars::error::PolarsError> for SvrlabError {
    fn from(err: polars::error::PolarsError) -> Self {
        SvrlabError::ParseError(err.to_string())
    }
}

impl From<serde_json::Error> for SvrlabError {
    fn from(err: serde_json::Error) -> Self {
        SvrlabError::validation("parameters", err.to_string())
    }
}
