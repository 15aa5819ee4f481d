// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! SidecarRunner against a local stub of the inference sidecar

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use visionai_node::{
    config::{AppConfig, ModelBackend},
    vision::{
        extract_metadata, optimize_image, CaptionParams, ModelRunner, PreparedImage, RunnerError,
        SidecarRunner, VisionModelManager,
    },
    VisionAnalyzer,
};

fn png() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb([12, 200, 40])));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn image_field(body: &Value) -> bool {
    body["image"].as_str().map(|s| !s.is_empty()).unwrap_or(false)
}

/// Sidecar whose detect endpoint is broken
fn stub_sidecar() -> Router {
    let routes = Router::new()
        .route("/health", get(|| async { Json(json!({"device": "cuda"})) }))
        .route(
            "/caption",
            post(|Json(body): Json<Value>| async move {
                if !image_field(&body) {
                    return (StatusCode::BAD_REQUEST, Json(json!({"error": "no image"})));
                }
                (
                    StatusCode::OK,
                    Json(json!({"text": format!("cap {}", body["max_length"])})),
                )
            }),
        )
        .route(
            "/classify",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["top_k"], 20);
                Json(json!({"predictions": [
                    {"label": "golden_retriever", "score": 0.8},
                    {"label": "tennis_ball", "score": 0.01}
                ]}))
            }),
        )
        .route(
            "/detect",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "detector crashed") }),
        )
        .route(
            "/categorize",
            post(|Json(body): Json<Value>| async move {
                let candidates = body["candidates"].as_array().cloned().unwrap_or_default();
                let scores: Vec<f32> = candidates
                    .iter()
                    .map(|c| if c == "indoor scene" { 0.7 } else { 0.0 })
                    .collect();
                Json(json!({"scores": scores}))
            }),
        );
    Router::new().nest("/v1", routes)
}

/// Sidecar that answers every call with an unexpected body
fn garbled_sidecar() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/classify", post(|| async { Json(json!({"labels": "?"})) }))
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn prepared() -> PreparedImage {
    optimize_image(&png()).unwrap()
}

#[tokio::test]
async fn test_probe_records_device() {
    let base = serve(stub_sidecar()).await;
    let runner = SidecarRunner::new(&format!("{}/v1/", base), Duration::from_secs(5)).unwrap();

    assert_eq!(runner.device(), "cpu");
    assert_eq!(runner.probe().await.unwrap(), "cuda");
    assert_eq!(runner.device(), "cuda");
}

#[tokio::test]
async fn test_each_capability_over_http() {
    let base = serve(stub_sidecar()).await;
    let runner = SidecarRunner::new(&format!("{}/v1", base), Duration::from_secs(5)).unwrap();
    let image = prepared();

    let caption = runner.caption(&image, &CaptionParams::detailed()).await.unwrap();
    assert_eq!(caption, "cap 80");

    let labels = runner.classify(&image, 20).await.unwrap();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0].label, "golden_retriever");

    let candidates = vec!["sunset".to_string(), "indoor scene".to_string()];
    let scores = runner.categorize(&image, &candidates).await.unwrap();
    assert_eq!(scores, vec![0.0, 0.7]);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let base = serve(stub_sidecar()).await;
    let runner = SidecarRunner::new(&format!("{}/v1", base), Duration::from_secs(5)).unwrap();

    let err = runner.detect(&prepared(), 0.05).await.unwrap_err();
    match err {
        RunnerError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "detector crashed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unexpected_body_is_malformed() {
    let base = serve(garbled_sidecar()).await;
    let runner = SidecarRunner::new(&base, Duration::from_secs(5)).unwrap();

    let err = runner.classify(&prepared(), 5).await.unwrap_err();
    assert!(matches!(err, RunnerError::Malformed(_)));

    // health that is not JSON leaves the device alone
    assert!(matches!(runner.probe().await, Err(RunnerError::Malformed(_))));
    assert_eq!(runner.device(), "cpu");

    let err = runner.detect(&prepared(), 0.05).await.unwrap_err();
    assert!(matches!(err, RunnerError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_failing_endpoint_degrades_only_that_model() {
    let base = serve(stub_sidecar()).await;
    let config = AppConfig {
        backend: ModelBackend::Sidecar,
        sidecar_url: format!("{}/v1", base),
        ..Default::default()
    };
    let manager = VisionModelManager::new(&config).await.unwrap();
    assert!(manager.is_available());
    assert_eq!(manager.device(), "CUDA");

    let analyzer = VisionAnalyzer::new(manager.runner());
    let bytes = png();
    let result = analyzer
        .analyze(&optimize_image(&bytes).unwrap(), extract_metadata(&bytes).unwrap())
        .await;

    assert_eq!(result.captions, vec!["cap 50", "cap 80", "cap 60"]);
    assert_eq!(result.labels.len(), 1);
    assert_eq!(result.labels[0].description, "Golden Retriever");
    assert_eq!(result.labels[0].confidence, 80.0);
    assert!(result.objects.is_empty());
    assert_eq!(result.scene_analysis.len(), 1);
    assert_eq!(result.scene_analysis[0].category, "Indoor Scene");
    assert_eq!(result.model_info.device, "CUDA");
    assert!(result.statistics.total_objects.is_none());
    assert_eq!(
        result.summary,
        "Cap 50. Scene appears to be indoor scene."
    );
}
