// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Preprocessing, analysis and export without the HTTP layer

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;
use visionai_node::{
    export::{ExportFormat, ExportService},
    vision::{extract_metadata, optimize_image, Detection, MockModelRunner, ScoredLabel},
    VisionAnalyzer,
};

fn rgba_png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 128])));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

#[tokio::test]
async fn test_large_image_is_downsampled_but_metadata_is_original() {
    let bytes = rgba_png(2048, 1024);

    let metadata = extract_metadata(&bytes).unwrap();
    assert_eq!((metadata.width, metadata.height), (2048, 1024));
    assert_eq!(metadata.aspect_ratio, 2.0);

    let prepared = optimize_image(&bytes).unwrap();
    assert_eq!((prepared.width(), prepared.height()), (1024, 512));
    assert!(prepared.encoded.starts_with(&[0xFF, 0xD8]));
}

#[tokio::test]
async fn test_street_scene() {
    let runner = MockModelRunner::new()
        .with_captions(&["cars parked along a city street", "a busy street"])
        .with_labels(vec![
            ScoredLabel::new("streetcar", 0.40),
            ScoredLabel::new("cab", 0.30),
            ScoredLabel::new("traffic_light", 0.01),
        ])
        .with_detections(vec![
            Detection::new("car", 0.95),
            Detection::new("car", 0.90),
            Detection::new("person", 0.80),
            Detection::new("car", 0.02),
        ])
        .with_category_score("city", 0.60)
        .with_category_score("street", 0.30);

    let analyzer = VisionAnalyzer::new(Arc::new(runner));
    let bytes = rgba_png(64, 64);
    let prepared = optimize_image(&bytes).unwrap();
    let result = analyzer.analyze(&prepared, extract_metadata(&bytes).unwrap()).await;

    assert_eq!(result.labels.len(), 2);
    assert_eq!(result.labels[0].description, "Streetcar");

    assert_eq!(result.objects.len(), 2);
    assert_eq!(result.objects[0].name, "Car");
    assert_eq!(result.objects[0].count, 2);
    assert_eq!(result.objects[0].confidence, 95.0);

    assert_eq!(result.statistics.total_objects, Some(3));
    assert_eq!(result.statistics.unique_objects, Some(2));
    assert_eq!(result.statistics.most_common.as_deref(), Some("Car"));
    assert_eq!(result.statistics.avg_confidence, Some(35.0));
    assert_eq!(result.statistics.top_confidence, Some(40.0));

    assert!(result.summary.starts_with("Cars parked along a city street."));
    assert!(result.summary.contains("Contains car and person."));
}

#[tokio::test]
async fn test_analysis_exports_in_both_formats() {
    let dir = TempDir::new().unwrap();
    let exporter = ExportService::new(dir.path()).unwrap();

    let analyzer = VisionAnalyzer::new(Arc::new(MockModelRunner::demo()));
    let bytes = rgba_png(32, 16);
    let prepared = optimize_image(&bytes).unwrap();
    let result = analyzer.analyze(&prepared, extract_metadata(&bytes).unwrap()).await;

    let json = exporter.export(&result, ExportFormat::Json).unwrap();
    let pdf = exporter.export(&result, ExportFormat::Pdf).unwrap();
    assert_ne!(json.filename, pdf.filename);

    let text = std::fs::read_to_string(&json.path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["summary"], result.summary.as_str());

    let pdf_bytes = std::fs::read(&pdf.path).unwrap();
    assert!(pdf_bytes.starts_with(b"%PDF"));
}
