// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module
//!
//! This module provides:
//! - Image ingestion (validation, base64 payloads, URL download)
//! - Preprocessing and metadata extraction
//! - The model runner interface with sidecar and mock backends

pub mod fetch;
pub mod image_utils;
pub mod metadata;
pub mod mock_runner;
pub mod model_manager;
pub mod preprocessing;
pub mod runner;
pub mod sidecar_client;

pub use fetch::ImageFetcher;
pub use image_utils::{decode_base64_payload, decode_image_bytes, detect_format, ImageError};
pub use metadata::{extract_metadata, ImageMetadata};
pub use mock_runner::MockModelRunner;
pub use model_manager::{VisionModelInfo, VisionModelManager};
pub use preprocessing::{optimize_image, PreparedImage};
pub use runner::{CaptionParams, Detection, ModelKind, ModelRunner, RunnerError, ScoredLabel};
pub use sidecar_client::SidecarRunner;
