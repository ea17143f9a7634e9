//! HTTP request handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use crate::data::{read_table, DatasetSummary};
use crate::error::SvrlabError;
use crate::training::{SvrParameters, TrainEngine, TrainingReport};

use super::error::{ApiError, Result};
use super::response::ApiResponse;
use super::ServerConfig;

/// Health check endpoint
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Upload a file and return schema information about the dataset
pub async fn upload_info(
    State(config): State<Arc<ServerConfig>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<DatasetSummary>>> {
    while let Some(field) = next_field(&mut multipart).await? {
        let name = field.name().unwrap_or("").to_string();
        if name != "file" {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| missing_field_error("file", "upload has no filename"))?;
        let bytes = read_field_bytes(field).await?;
        check_size(bytes.len(), config.max_upload_size)?;

        info!(filename = %filename, size_bytes = bytes.len(), "Received file for schema summary");

        let df = read_table(&bytes, &filename).map_err(ApiError)?;
        let summary = DatasetSummary::describe(&df, &filename);

        return Ok(Json(ApiResponse::ok("File uploaded successfully", summary)));
    }

    Err(missing_field_error("file", "no file field in multipart body"))
}

/// Train an SVR model and return metrics, sample counts and plots
pub async fn train_svr(
    State(config): State<Arc<ServerConfig>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<TrainingReport>>> {
    let mut file: Option<(String, Bytes)> = None;
    let mut raw_parameters: Option<String> = None;

    while let Some(field) = next_field(&mut multipart).await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| missing_field_error("file", "upload has no filename"))?;
                let bytes = read_field_bytes(field).await?;
                file = Some((filename, bytes));
            }
            "parameters" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError(SvrlabError::ParseError(e.to_string())))?;
                raw_parameters = Some(text);
            }
            _ => {}
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| missing_field_error("file", "no file field in multipart body"))?;
    let raw = raw_parameters
        .ok_or_else(|| missing_field_error("parameters", "no parameters field in multipart body"))?;

    check_size(bytes.len(), config.max_upload_size)?;

    let params: SvrParameters =
        serde_json::from_str(&raw).map_err(|e| ApiError(SvrlabError::from(e)))?;

    info!(
        filename = %filename,
        target_column = %params.target_column,
        "Received training request"
    );

    let df = read_table(&bytes, &filename).map_err(ApiError)?;

    // Kernel training is CPU-bound; keep it off the async runtime
    let report = tokio::task::spawn_blocking(move || TrainEngine::new(params).run(&df))
        .await
        .map_err(|e| ApiError(SvrlabError::Internal(e.to_string())))?
        .map_err(ApiError)?;

    Ok(Json(ApiResponse::ok(
        "SVR model trained successfully",
        report,
    )))
}

async fn next_field(
    multipart: &mut Multipart,
) -> Result<Option<axum::extract::multipart::Field<'_>>> {
    multipart
        .next_field()
        .await
        .map_err(|e| ApiError(SvrlabError::ParseError(format!("multipart body: {}", e))))
}

async fn read_field_bytes(field: axum::extract::multipart::Field<'_>) -> Result<Bytes> {
    field
        .bytes()
        .await
        .map_err(|e| ApiError(SvrlabError::ParseError(format!("multipart body: {}", e))))
}

fn check_size(size: usize, limit: usize) -> Result<()> {
    if size > limit {
        return Err(ApiError(SvrlabError::PayloadTooLarge { size, limit }));
    }
    Ok(())
}

fn missing_field_error(field: &str, reason: &str) -> ApiError {
    ApiError(SvrlabError::validation(field, reason))
}
