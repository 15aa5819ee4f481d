// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze endpoint handler

use axum::{
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use axum_extra::extract::Multipart;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::request::{AnalyzeRequest, ImageSource};
use crate::analysis::AnalysisResult;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::response::ApiResponse;
use crate::vision::image_utils::{decode_base64_payload, validate_image};
use crate::vision::metadata::extract_metadata;
use crate::vision::preprocessing::optimize_image;

/// POST /analyze - Analyze an image
///
/// Accepts either a multipart upload (field `file`) or a JSON body
/// `{type: "url" | "base64", data}`.
///
/// # Response
/// `{success: true, data: AnalysisResult, message}`
///
/// # Errors
/// - 400 Bad Request: missing/invalid input, download failure, bad image
/// - 500 Internal Server Error: the image passed validation but could not be
///   prepared for the models
pub async fn analyze_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<ApiResponse<AnalysisResult>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("analyze", request_id = %request_id);
    handle(state, request).instrument(span).await
}

async fn handle(state: AppState, request: Request) -> Result<ApiResponse<AnalysisResult>, ApiError> {
    let source = read_source(&state, request).await?;
    debug!("Analyze request: {}", source.describe());

    let bytes = load_bytes(&state, source).await.map_err(|e| {
        warn!("Rejected input: {}", e);
        e
    })?;

    let result = run_analysis(&state, bytes).await?;
    info!(
        "Analysis ready: {} captions, {} labels, {} objects, {} scenes",
        result.captions.len(),
        result.labels.len(),
        result.objects.len(),
        result.scene_analysis.len()
    );

    Ok(ApiResponse::ok(result, "Analysis completed successfully"))
}

/// Pick the request flavour by content type and extract the image source
async fn read_source(state: &AppState, request: Request) -> Result<ImageSource, ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?
        {
            if field.name() != Some("file") {
                continue;
            }
            let filename = field.file_name().map(|s| s.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
            return ImageSource::upload(filename.as_deref(), bytes);
        }
        return Err(ApiError::InvalidRequest("No image provided".to_string()));
    }

    if content_type.starts_with("application/json") {
        let Json(body) = Json::<AnalyzeRequest>::from_request(request, state)
            .await
            .map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
        return body.into_source();
    }

    Err(ApiError::InvalidRequest("No image provided".to_string()))
}

/// Resolve the source to validated image bytes
async fn load_bytes(state: &AppState, source: ImageSource) -> Result<Vec<u8>, ApiError> {
    let bytes = match source {
        ImageSource::Upload { bytes, .. } => bytes.to_vec(),
        ImageSource::Url(url) => state.fetcher.download(&url).await?,
        ImageSource::Base64(data) => decode_base64_payload(&data)?,
    };
    validate_image(&bytes)?;
    Ok(bytes)
}

/// Prepare the image off the async runtime, then run the models
async fn run_analysis(state: &AppState, bytes: Vec<u8>) -> Result<AnalysisResult, ApiError> {
    let (prepared, metadata) = tokio::task::spawn_blocking(move || {
        let metadata = extract_metadata(&bytes)?;
        let prepared = optimize_image(&bytes)?;
        Ok::<_, crate::vision::ImageError>((prepared, metadata))
    })
    .await
    .map_err(|e| {
        error!("Preprocessing task failed: {}", e);
        ApiError::InternalError(e.to_string())
    })?
    .map_err(|e| {
        error!("Image preparation failed: {}", e);
        ApiError::PipelineFailure(e.to_string())
    })?;

    Ok(state.analyzer.analyze(&prepared, metadata).await)
}
