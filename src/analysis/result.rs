// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analysis result document

use serde::{Deserialize, Serialize};

use crate::vision::metadata::{format_decimal, ImageMetadata};
use crate::vision::model_manager::{
    CAPTIONING_MODEL, CLASSIFICATION_MODEL, DETECTION_MODEL, SCENE_MODEL,
};

/// Classification label with confidence in percent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    pub description: String,
    pub confidence: f64,
}

/// Detected object class, merged across instances
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectedObject {
    pub name: String,
    pub count: u32,
    /// Highest confidence among merged instances, in percent
    pub confidence: f64,
}

/// Scene/category match with confidence in percent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneCategory {
    pub category: String,
    pub confidence: f64,
}

/// Aggregate metrics; a key is present only when its source list is non-empty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_objects: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_objects: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_matches: Option<usize>,
}

impl Statistics {
    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    /// Present metrics as (title-cased key, display value) rows in field order
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = Vec::new();
        if let Some(v) = self.total_objects {
            rows.push(("Total Objects", v.to_string()));
        }
        if let Some(v) = self.unique_objects {
            rows.push(("Unique Objects", v.to_string()));
        }
        if let Some(v) = &self.most_common {
            rows.push(("Most Common", v.clone()));
        }
        if let Some(v) = self.avg_confidence {
            rows.push(("Avg Confidence", format_decimal(v)));
        }
        if let Some(v) = self.top_confidence {
            rows.push(("Top Confidence", format_decimal(v)));
        }
        if let Some(v) = self.scene_matches {
            rows.push(("Scene Matches", v.to_string()));
        }
        rows
    }
}

/// Static description of the models behind an analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    pub captioning: String,
    pub classification: String,
    pub detection: String,
    pub scene_understanding: String,
    pub mode: String,
    pub device: String,
}

impl ModelInfo {
    pub fn for_device(device: &str) -> Self {
        Self {
            captioning: CAPTIONING_MODEL.to_string(),
            classification: CLASSIFICATION_MODEL.to_string(),
            detection: DETECTION_MODEL.to_string(),
            scene_understanding: SCENE_MODEL.to_string(),
            mode: "Local Inference".to_string(),
            device: device.to_uppercase(),
        }
    }
}

/// Full output of one image analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    pub summary: String,
    pub statistics: Statistics,
    pub captions: Vec<String>,
    pub labels: Vec<Label>,
    pub objects: Vec<DetectedObject>,
    #[serde(alias = "scene_categories", alias = "sceneCategories")]
    pub scene_analysis: Vec<SceneCategory>,
    pub metadata: ImageMetadata,
    #[serde(alias = "modelInfo")]
    pub model_info: ModelInfo,
}
