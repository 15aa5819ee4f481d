// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the VisionAI node

/// Application name reported by /health
pub const APP_NAME: &str = "VisionAI";

/// Semantic version number
pub const VERSION: &str = "2.0.0";

/// Supported features, reported by /health and the startup banner
pub const FEATURES: &[&str] = &[
    "image-captioning",
    "image-classification",
    "object-detection",
    "scene-matching",
    "json-export",
    "pdf-export",
    "url-ingestion",
    "base64-ingestion",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} v{}", APP_NAME, VERSION)
}
