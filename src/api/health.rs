// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! GET /health - liveness, version and model availability

use axum::{extract::State, Json};
use serde::Serialize;

use super::http_server::AppState;
use crate::version::{APP_NAME, FEATURES, VERSION};
use crate::vision::VisionModelInfo;

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub app: &'static str,
    pub version: &'static str,
    pub features: &'static [&'static str],
    /// Compute device, upper-cased
    pub device: String,
    pub models: Vec<VisionModelInfo>,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        app: APP_NAME,
        version: VERSION,
        features: FEATURES,
        device: state.manager.device(),
        models: state.manager.list_models(),
    })
}
