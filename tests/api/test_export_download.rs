// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /export and GET /download/{filename}

use axum::http::{header, Method, Request, StatusCode};
use axum::body::Body;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use visionai_node::vision::MockModelRunner;

use super::helpers::*;

async fn analyzed(app: &axum::Router) -> Value {
    let response = send(app, multipart_request("/analyze", "file", "a.png", &png_bytes(6, 3))).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_json_export_then_download() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());
    let data = analyzed(&app).await;

    let response = send(
        &app,
        json_request(Method::POST, "/export", json!({"format": "json", "data": data})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Exported as JSON");

    let filename = body["data"]["filename"].as_str().unwrap().to_string();
    assert!(filename.starts_with("visionai_analysis_"));
    assert!(filename.ends_with(".json"));
    assert!(dir.path().join(&filename).exists());

    let response = send(&app, get(&format!("/download/{}", filename))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains(&filename));

    let document: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert!(document["timestamp"].is_string());
    assert_eq!(document["summary"], data["summary"]);
    assert_eq!(document["metadata"]["width"], 6);
}

#[tokio::test]
async fn test_pdf_export_then_download() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());
    let data = analyzed(&app).await;

    let response = send(
        &app,
        json_request(Method::POST, "/api/export", json!({"format": "pdf", "data": data})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Exported as PDF");
    let filename = body["data"]["filename"].as_str().unwrap().to_string();
    assert!(filename.ends_with(".pdf"));

    let response = send(&app, get(&format!("/api/download/{}", filename))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_format_defaults_to_json() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());

    let response = send(
        &app,
        json_request(Method::POST, "/export", json!({"data": {"summary": "A cat."}})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["data"]["filename"].as_str().unwrap().ends_with(".json"));
}

#[tokio::test]
async fn test_export_without_data() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());

    for payload in [json!({"format": "json"}), json!({"format": "pdf", "data": {}})] {
        let response = send(&app, json_request(Method::POST, "/export", payload)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "No data to export");
    }
}

#[tokio::test]
async fn test_export_unknown_format() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());

    let response = send(
        &app,
        json_request(Method::POST, "/export", json!({"format": "docx", "data": {"summary": "x"}})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Invalid format");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_download_missing_file() {
    let dir = TempDir::new().unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), dir.path());

    let response = send(&app, get("/download/visionai_analysis_nope.json")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "File not found");
}

#[tokio::test]
async fn test_download_rejects_traversal() {
    let dir = TempDir::new().unwrap();
    let exports = dir.path().join("exports");
    std::fs::write(dir.path().join("secret.json"), b"{}").unwrap();
    let app = app_with(Arc::new(MockModelRunner::demo()), &exports);

    let response = send(&app, get("/download/..%2Fsecret.json")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
