// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! GET /download/{filename} - stream an exported report

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use super::errors::ApiError;
use super::http_server::AppState;
use crate::export::content_type_for;

pub async fn download_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let not_found = || ApiError::NotFound("File not found".to_string());

    let path = state.exporter.resolve(&filename).ok_or_else(|| {
        warn!("Download refused: {}", filename);
        not_found()
    })?;

    let file = tokio::fs::File::open(&path).await.map_err(|e| {
        warn!("Failed to open {}: {}", path.display(), e);
        not_found()
    })?;
    debug!("Streaming {}", path.display());

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|_| not_found())?;

    let body = Body::from_stream(ReaderStream::new(file));
    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(content_type_for(&filename)),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
