// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fixed analysis and ingestion constants
//!
//! These are compiled in rather than exposed as runtime flags: changing them
//! changes the shape of every analysis result.

/// Maximum accepted image payload (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// File extensions accepted for multipart uploads
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Minimum model score (0.0-1.0) for a candidate to be reported
pub const CONFIDENCE_THRESHOLD: f32 = 0.05;

/// Number of caption generations requested per image
pub const MAX_CAPTIONS: usize = 3;

/// Maximum classification labels in a result
pub const MAX_LABELS: usize = 20;

/// Maximum distinct detected objects in a result
pub const MAX_OBJECTS: usize = 15;

/// Maximum scene/category matches in a result
pub const SCENE_TOP_K: usize = 10;

/// Larger side of the image handed to the models
pub const MAX_IMAGE_DIMENSION: u32 = 1024;

/// JPEG quality used when re-encoding
pub const IMAGE_QUALITY: u8 = 90;

/// Timeout for fetching images by URL
pub const URL_FETCH_TIMEOUT_SECS: u64 = 15;

/// Rows rendered in the PDF labels table
pub const PDF_MAX_LABELS: usize = 15;

/// Rows rendered in the PDF objects table
pub const PDF_MAX_OBJECTS: usize = 10;

/// Caption substituted when generation fails
pub const CAPTION_FALLBACK: &str = "Unable to generate caption";

/// Summary used when no model produced anything usable
pub const SUMMARY_FALLBACK: &str = "Image analyzed successfully.";

/// Request body ceiling; larger than [`MAX_FILE_SIZE`] so base64 payloads
/// reach validation and get a descriptive error.
pub const MAX_REQUEST_BODY: usize = 32 * 1024 * 1024;
