// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, path::Path, sync::Arc};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use super::analyze::analyze_handler;
use super::download::download_handler;
use super::export::export_handler;
use super::health::health_handler;
use crate::analysis::VisionAnalyzer;
use crate::config::defaults::MAX_REQUEST_BODY;
use crate::export::ExportService;
use crate::vision::{ImageFetcher, VisionModelManager};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<VisionModelManager>,
    pub analyzer: Arc<VisionAnalyzer>,
    pub exporter: Arc<ExportService>,
    pub fetcher: Arc<ImageFetcher>,
}

impl AppState {
    pub fn new(manager: VisionModelManager, exporter: ExportService) -> anyhow::Result<Self> {
        let analyzer = VisionAnalyzer::new(manager.runner());
        Ok(Self {
            manager: Arc::new(manager),
            analyzer: Arc::new(analyzer),
            exporter: Arc::new(exporter),
            fetcher: Arc::new(ImageFetcher::new()?),
        })
    }
}

/// API routes without static files or outer layers
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/analyze", post(analyze_handler))
        .route("/export", post(export_handler))
        .route("/download/:filename", get(download_handler))
}

/// Build the application router
///
/// Routes are reachable both at the root and under `/api` (the prefix the
/// bundled front-end uses).
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(api_routes())
        .nest("/api", api_routes())
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `app` on `addr`, with `static_dir` as the fallback when it exists
pub async fn start_server(
    state: AppState,
    addr: SocketAddr,
    static_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let mut app = create_app(state);

    match static_dir {
        Some(dir) if dir.is_dir() => {
            tracing::info!("Serving front-end from {}", dir.display());
            app = app.fallback_service(ServeDir::new(dir));
        }
        Some(dir) => {
            tracing::warn!("Static directory {} not found, front-end disabled", dir.display());
        }
        None => {}
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🌐 API server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
