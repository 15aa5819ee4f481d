// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /analyze tests
//!
//! Covers the three input flavours (multipart, base64, URL), input rejection
//! with the error envelope, and model failure isolation.

use axum::http::{Method, Request, StatusCode};
use axum::body::Body;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use visionai_node::vision::{MockModelRunner, ModelKind};

use super::helpers::*;

#[tokio::test]
async fn test_multipart_png_end_to_end() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());

    let response = send(&app, multipart_request("/analyze", "file", "tiny.png", &png_bytes(2, 2))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Analysis completed successfully");

    let data = &body["data"];
    assert_eq!(data["metadata"]["width"], 2);
    assert_eq!(data["metadata"]["height"], 2);
    assert_eq!(data["metadata"]["aspect_ratio"], 1.0);
    assert_eq!(data["metadata"]["format"], "PNG");
    assert_eq!(data["model_info"]["device"], "CPU");
    assert!(data["summary"].as_str().unwrap().len() > 0);
    assert!(data["scene_analysis"].is_array());
}

#[tokio::test]
async fn test_base64_with_data_uri_prefix() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());

    let payload = format!("data:image/png;base64,{}", STANDARD.encode(png_bytes(8, 4)));
    let request = json_request(
        Method::POST,
        "/analyze",
        json!({"type": "base64", "data": payload}),
    );
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["metadata"]["aspect_ratio"], 2.0);
}

#[tokio::test]
async fn test_malformed_base64_rejected() {
    let dir = TempDir::new().unwrap();
    let runner = Arc::new(MockModelRunner::demo());
    let app = app_with(runner.clone(), dir.path());

    let request = json_request(
        Method::POST,
        "/analyze",
        json!({"type": "base64", "data": "!!!not-base64!!!"}),
    );
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid base64"));
    assert!(body.get("data").is_none());
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn test_unreachable_url_rejected_without_model_calls() {
    let dir = TempDir::new().unwrap();
    let runner = Arc::new(MockModelRunner::demo());
    let app = app_with(runner.clone(), dir.path());

    let request = json_request(
        Method::POST,
        "/analyze",
        json!({"type": "url", "data": "http://127.0.0.1:9/cat.png"}),
    );
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(runner.call_count(), 0);
}

/// Local host serving a web page, a missing file and a fake image
async fn image_host() -> String {
    use axum::{http::header, routing::get, Router};

    let app = Router::new()
        .route(
            "/page",
            get(|| async { ([(header::CONTENT_TYPE, "text/html")], "<html>not an image</html>") }),
        )
        .route(
            "/fake.png",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], "definitely not png bytes") }),
        )
        .route(
            "/real.png",
            get(|| async { ([(header::CONTENT_TYPE, "image/png")], png_bytes(3, 3)) }),
        );
    serve_local(app).await
}

async fn analyze_url(url: String) -> (StatusCode, serde_json::Value, usize) {
    let dir = TempDir::new().unwrap();
    let runner = Arc::new(MockModelRunner::demo());
    let app = app_with(runner.clone(), dir.path());

    let request = json_request(Method::POST, "/analyze", json!({"type": "url", "data": url}));
    let response = send(&app, request).await;
    let status = response.status();
    (status, body_json(response).await, runner.call_count())
}

#[tokio::test]
async fn test_url_serving_html_rejected() {
    let base = image_host().await;
    let (status, body, calls) = analyze_url(format!("{}/page", base)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "URL does not point to an image");
    assert_eq!(calls, 0);
}

#[tokio::test]
async fn test_url_not_found_rejected() {
    let base = image_host().await;
    let (status, body, calls) = analyze_url(format!("{}/missing.png", base)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Download failed"));
    assert!(message.contains("404"));
    assert_eq!(calls, 0);
}

#[tokio::test]
async fn test_url_with_undecodable_image_rejected() {
    let base = image_host().await;
    let (status, body, calls) = analyze_url(format!("{}/fake.png", base)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid image"));
    assert_eq!(calls, 0);
}

#[tokio::test]
async fn test_url_with_real_image_analyzed() {
    let base = image_host().await;
    let (status, body, calls) = analyze_url(format!("{}/real.png", base)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["metadata"]["width"], 3);
    assert!(calls > 0);
}

#[tokio::test]
async fn test_non_http_url_rejected() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());

    let request = json_request(
        Method::POST,
        "/analyze",
        json!({"type": "url", "data": "file:///etc/hosts"}),
    );
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().starts_with("Invalid URL"));
}

#[tokio::test]
async fn test_unknown_request_type() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());

    let request = json_request(Method::POST, "/analyze", json!({"type": "camera"}));
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid request type");
}

#[tokio::test]
async fn test_missing_body() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/analyze")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No image provided");
}

#[tokio::test]
async fn test_malformed_json_gets_envelope() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn test_disallowed_extension() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());

    let response = send(&app, multipart_request("/analyze", "file", "notes.txt", &png_bytes(2, 2))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid file type");
}

#[tokio::test]
async fn test_multipart_without_file_field() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());

    let response = send(&app, multipart_request("/analyze", "image", "a.png", &png_bytes(2, 2))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No image provided");
}

#[tokio::test]
async fn test_corrupt_image_rejected() {
    let dir = TempDir::new().unwrap();
    let runner = Arc::new(MockModelRunner::demo());
    let app = app_with(runner.clone(), dir.path());

    let mut bytes = png_bytes(2, 2);
    bytes.truncate(20);
    let response = send(&app, multipart_request("/analyze", "file", "broken.png", &bytes)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().starts_with("Invalid image"));
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn test_degraded_models_still_succeed() {
    let dir = TempDir::new().unwrap();
    let runner = MockModelRunner::demo()
        .failing(ModelKind::Detection)
        .failing(ModelKind::SceneMatching);
    let app = app_with(Arc::new(runner), dir.path());

    let response = send(&app, multipart_request("/analyze", "file", "a.png", &png_bytes(4, 4))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["objects"], json!([]));
    assert_eq!(data["scene_analysis"], json!([]));
    assert!(data["labels"].as_array().unwrap().len() > 0);
    assert!(data["statistics"].get("total_objects").is_none());
    assert!(data["statistics"].get("avg_confidence").is_some());
}

#[tokio::test]
async fn test_api_prefix_route() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());

    let response = send(&app, multipart_request("/api/analyze", "file", "a.jpg", &png_bytes(2, 2))).await;
    assert_eq!(response.status(), StatusCode::OK);
}
