// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Export endpoint handler

use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use tracing::{error, info, warn};

use super::request::ExportRequest;
use super::response::ExportResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::response::ApiResponse;

/// POST /export - Write an analysis result as JSON or PDF
///
/// # Request
/// - `format`: "json" (default) or "pdf"
/// - `data`: the AnalysisResult to export
///
/// # Errors
/// - 400 Bad Request: "No data to export", "Invalid format", malformed body
/// - 500 Internal Server Error: the report could not be written
pub async fn export_handler(
    State(state): State<AppState>,
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<ApiResponse<ExportResponse>, ApiError> {
    let Json(request) = body.map_err(|e| {
        warn!("Malformed export request: {}", e.body_text());
        ApiError::InvalidRequest(e.body_text())
    })?;

    let (format, result) = request.validate().map_err(|e| {
        warn!("Export rejected: {}", e);
        ApiError::from(e)
    })?;

    let exporter = state.exporter.clone();
    let file = tokio::task::spawn_blocking(move || exporter.export(&result, format))
        .await
        .map_err(|e| {
            error!("Export task failed: {}", e);
            ApiError::InternalError(e.to_string())
        })?
        .map_err(|e| {
            error!("Export failed: {}", e);
            ApiError::from(e)
        })?;

    info!("Export written: {}", file.filename);
    Ok(ApiResponse::ok(
        ExportResponse {
            filename: file.filename,
        },
        format!("Exported as {}", format),
    ))
}
