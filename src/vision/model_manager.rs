// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision model manager: selects the inference backend and reports model
//! availability

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::mock_runner::MockModelRunner;
use super::runner::ModelRunner;
use super::sidecar_client::SidecarRunner;
use crate::config::{AppConfig, ModelBackend};

/// Display names of the four pretrained models
pub const CAPTIONING_MODEL: &str = "BLIP (Salesforce)";
pub const CLASSIFICATION_MODEL: &str = "ViT (Google)";
pub const DETECTION_MODEL: &str = "DETR (Facebook)";
pub const SCENE_MODEL: &str = "CLIP (OpenAI)";

/// Information about a vision model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisionModelInfo {
    /// Model display name
    pub name: String,
    /// Task the model performs
    pub task: String,
    /// Whether the backend answered at startup
    pub available: bool,
}

/// Owns the model runner shared by all requests
pub struct VisionModelManager {
    runner: Arc<dyn ModelRunner>,
    backend: ModelBackend,
    available: bool,
}

impl VisionModelManager {
    /// Build the runner for the configured backend
    ///
    /// An unreachable sidecar is not fatal: models are reported unavailable
    /// and each analysis degrades to fallbacks until the sidecar comes up.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        match config.backend {
            ModelBackend::Mock => {
                tracing::info!("Using mock model backend");
                Ok(Self::with_runner(Arc::new(MockModelRunner::demo()), ModelBackend::Mock))
            }
            ModelBackend::Sidecar => {
                let runner = SidecarRunner::new(
                    &config.sidecar_url,
                    Duration::from_secs(config.sidecar_timeout_secs),
                )?;
                let available = match runner.probe().await {
                    Ok(device) => {
                        tracing::info!("✅ Vision models ready on {}", device.to_uppercase());
                        true
                    }
                    Err(e) => {
                        tracing::warn!(
                            "⚠️ Inference sidecar at {} not reachable: {}",
                            config.sidecar_url,
                            e
                        );
                        false
                    }
                };
                Ok(Self {
                    runner: Arc::new(runner),
                    backend: ModelBackend::Sidecar,
                    available,
                })
            }
        }
    }

    /// Wrap an existing runner (tests, embedding)
    pub fn with_runner(runner: Arc<dyn ModelRunner>, backend: ModelBackend) -> Self {
        Self {
            runner,
            backend,
            available: true,
        }
    }

    pub fn runner(&self) -> Arc<dyn ModelRunner> {
        self.runner.clone()
    }

    pub fn backend(&self) -> ModelBackend {
        self.backend
    }

    /// Compute device, upper-cased for display
    pub fn device(&self) -> String {
        self.runner.device().to_uppercase()
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// List the four vision models
    pub fn list_models(&self) -> Vec<VisionModelInfo> {
        [
            (CAPTIONING_MODEL, "captioning"),
            (CLASSIFICATION_MODEL, "classification"),
            (DETECTION_MODEL, "detection"),
            (SCENE_MODEL, "scene_understanding"),
        ]
        .iter()
        .map(|(name, task)| VisionModelInfo {
            name: name.to_string(),
            task: task.to_string(),
            available: self.available,
        })
        .collect()
    }
}
