// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::response::ApiResponse;
use crate::export::ExportError;
use crate::vision::image_utils::ImageError;

/// HTTP-facing error taxonomy
///
/// Model failures never appear here; they are absorbed by the analyzer.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Bad client input (400)
    InvalidRequest(String),
    /// Download target missing or unsafe (404)
    NotFound(String),
    /// Analysis could not run at all (500)
    PipelineFailure(String),
    /// Export could not be written (500)
    ExportFailed(String),
    InternalError(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::PipelineFailure(_)
            | ApiError::ExportFailed(_)
            | ApiError::InternalError(_) => 500,
        }
    }

    /// Message placed in the response envelope
    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidRequest(msg) | ApiError::NotFound(msg) => msg.clone(),
            ApiError::PipelineFailure(msg) => format!("Analysis failed: {}", msg),
            ApiError::ExportFailed(msg) => format!("Export failed: {}", msg),
            ApiError::InternalError(msg) => format!("Internal error: {}", msg),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<ImageError> for ApiError {
    fn from(e: ImageError) -> Self {
        ApiError::InvalidRequest(e.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        if e.is_client_error() {
            ApiError::InvalidRequest(e.to_string())
        } else {
            ApiError::ExportFailed(e.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, ApiResponse::<()>::error(self.message())).into_response()
    }
}
