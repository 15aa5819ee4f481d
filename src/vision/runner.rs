// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model runner abstraction
//!
//! The four vision capabilities are black boxes: a runner receives a
//! prepared image and returns raw model output on the 0.0-1.0 score scale.
//! Thresholding, merging and formatting happen in the analysis layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::preprocessing::PreparedImage;

/// Errors raised by a model runner
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Model request failed: {0}")]
    Request(String),

    #[error("Model service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed model output: {0}")]
    Malformed(String),

    #[error("Model unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for RunnerError {
    fn from(e: reqwest::Error) -> Self {
        RunnerError::Request(e.to_string())
    }
}

/// The four capabilities a runner provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Captioning,
    Classification,
    Detection,
    SceneMatching,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Captioning => write!(f, "captioning"),
            ModelKind::Classification => write!(f, "classification"),
            ModelKind::Detection => write!(f, "detection"),
            ModelKind::SceneMatching => write!(f, "scene matching"),
        }
    }
}

/// Decoding parameters for one caption generation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionParams {
    pub max_length: u32,
    pub num_beams: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub do_sample: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

impl CaptionParams {
    /// Short beam-search caption
    pub fn standard() -> Self {
        Self {
            max_length: 50,
            num_beams: 3,
            temperature: None,
            do_sample: false,
            top_k: None,
        }
    }

    /// Longer, wider beam search
    pub fn detailed() -> Self {
        Self {
            max_length: 80,
            num_beams: 5,
            temperature: Some(0.9),
            do_sample: false,
            top_k: None,
        }
    }

    /// Sampled caption
    pub fn creative() -> Self {
        Self {
            max_length: 60,
            num_beams: 4,
            temperature: None,
            do_sample: true,
            top_k: Some(50),
        }
    }

    /// Presets in generation order
    pub fn presets() -> [CaptionParams; 3] {
        [Self::standard(), Self::detailed(), Self::creative()]
    }
}

/// A class label with its raw score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLabel {
    pub label: String,
    pub score: f32,
}

impl ScoredLabel {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// A single detection; the same label may appear many times
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub score: f32,
    /// [x_min, y_min, x_max, y_max] in pixels
    #[serde(default, rename = "box", skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f32; 4]>,
}

impl Detection {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
            bbox: None,
        }
    }
}

/// Pretrained-model inference behind a uniform async interface
///
/// Implementations are shared read-only across requests.
#[async_trait]
pub trait ModelRunner: Send + Sync {
    /// Compute device the models run on (e.g. "cuda", "cpu")
    fn device(&self) -> String;

    /// Generate one caption with the given decoding parameters
    async fn caption(
        &self,
        image: &PreparedImage,
        params: &CaptionParams,
    ) -> Result<String, RunnerError>;

    /// Top-k class probabilities, highest first
    async fn classify(
        &self,
        image: &PreparedImage,
        top_k: usize,
    ) -> Result<Vec<ScoredLabel>, RunnerError>;

    /// Object detections scoring at or above `threshold`
    async fn detect(
        &self,
        image: &PreparedImage,
        threshold: f32,
    ) -> Result<Vec<Detection>, RunnerError>;

    /// One probability per candidate phrase, in candidate order
    async fn categorize(
        &self,
        image: &PreparedImage,
        candidates: &[String],
    ) -> Result<Vec<f32>, RunnerError>;
}
