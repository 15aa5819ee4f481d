// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use std::sync::Arc;
use tempfile::TempDir;
use visionai_node::vision::MockModelRunner;

use super::helpers::*;

#[tokio::test]
async fn test_health_reports_models() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());

    for uri in ["/health", "/api/health"] {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["app"], "VisionAI");
        assert_eq!(body["version"], "2.0.0");
        assert_eq!(body["device"], "CPU");
        assert!(body["features"]
            .as_array()
            .unwrap()
            .iter()
            .any(|f| f == "pdf-export"));

        let models = body["models"].as_array().unwrap();
        assert_eq!(models.len(), 4);
        assert!(models.iter().all(|m| m["available"] == true));
        assert_eq!(models[3]["task"], "scene_understanding");
    }
}

#[tokio::test]
async fn test_reports_gpu_device() {
    let dir = TempDir::new().unwrap();
    let app = app_with(
        Arc::new(MockModelRunner::demo().with_device("cuda")),
        dir.path(),
    );

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let body = body_json(send(&app, request).await).await;
    assert_eq!(body["device"], "CUDA");
}

#[tokio::test]
async fn test_unknown_route() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());

    let request = Request::builder()
        .uri("/nonexistent")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
