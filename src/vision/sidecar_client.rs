// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Inference sidecar client
//!
//! The pretrained models (BLIP, ViT, DETR, CLIP) are served by a separate
//! process exposing one JSON endpoint per capability. This client adapts that
//! API to [`ModelRunner`].

use anyhow::Result;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, info};

use super::preprocessing::PreparedImage;
use super::runner::{CaptionParams, Detection, ModelRunner, RunnerError, ScoredLabel};

// --- Sidecar wire structs ---

#[derive(Serialize)]
struct CaptionRequest<'a> {
    image: &'a str,
    #[serde(flatten)]
    params: &'a CaptionParams,
}

#[derive(Deserialize)]
struct CaptionResponse {
    text: String,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    image: &'a str,
    top_k: usize,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    predictions: Vec<ScoredLabel>,
}

#[derive(Serialize)]
struct DetectRequest<'a> {
    image: &'a str,
    threshold: f32,
}

#[derive(Deserialize)]
struct DetectResponse {
    detections: Vec<Detection>,
}

#[derive(Serialize)]
struct CategorizeRequest<'a> {
    image: &'a str,
    candidates: &'a [String],
}

#[derive(Deserialize)]
struct CategorizeResponse {
    scores: Vec<f32>,
}

#[derive(Deserialize)]
struct HealthResponse {
    device: String,
}

/// Client for the vision inference sidecar
pub struct SidecarRunner {
    client: Client,
    endpoint: String,
    device: RwLock<String>,
}

impl SidecarRunner {
    /// Create a new sidecar client
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!("Sidecar runner configured: endpoint={}", endpoint);

        Ok(Self {
            client,
            endpoint,
            device: RwLock::new("cpu".to_string()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query the sidecar for its compute device and remember it
    ///
    /// Called once at startup; the sidecar loads its weights before it
    /// answers.
    pub async fn probe(&self) -> Result<String, RunnerError> {
        let response = self
            .client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await?;
        let health: HealthResponse = Self::read_json(response).await?;

        if let Ok(mut device) = self.device.write() {
            *device = health.device.clone();
        }
        Ok(health.device)
    }

    async fn post<Req: Serialize + ?Sized, Resp: DeserializeOwned>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp, RunnerError> {
        let start = std::time::Instant::now();
        let response = self
            .client
            .post(format!("{}/{}", self.endpoint, path))
            .json(body)
            .send()
            .await?;

        let parsed = Self::read_json(response).await?;
        debug!("Sidecar /{} answered in {}ms", path, start.elapsed().as_millis());
        Ok(parsed)
    }

    async fn read_json<Resp: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Resp, RunnerError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RunnerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| RunnerError::Malformed(e.to_string()))
    }
}

fn encode_image(image: &PreparedImage) -> String {
    STANDARD.encode(&image.encoded)
}

#[async_trait]
impl ModelRunner for SidecarRunner {
    fn device(&self) -> String {
        self.device
            .read()
            .map(|d| d.clone())
            .unwrap_or_else(|_| "cpu".to_string())
    }

    async fn caption(
        &self,
        image: &PreparedImage,
        params: &CaptionParams,
    ) -> Result<String, RunnerError> {
        let encoded = encode_image(image);
        let response: CaptionResponse = self
            .post(
                "caption",
                &CaptionRequest {
                    image: &encoded,
                    params,
                },
            )
            .await?;
        Ok(response.text.trim().to_string())
    }

    async fn classify(
        &self,
        image: &PreparedImage,
        top_k: usize,
    ) -> Result<Vec<ScoredLabel>, RunnerError> {
        let encoded = encode_image(image);
        let response: ClassifyResponse = self
            .post(
                "classify",
                &ClassifyRequest {
                    image: &encoded,
                    top_k,
                },
            )
            .await?;
        Ok(response.predictions)
    }

    async fn detect(
        &self,
        image: &PreparedImage,
        threshold: f32,
    ) -> Result<Vec<Detection>, RunnerError> {
        let encoded = encode_image(image);
        let response: DetectResponse = self
            .post(
                "detect",
                &DetectRequest {
                    image: &encoded,
                    threshold,
                },
            )
            .await?;
        Ok(response.detections)
    }

    async fn categorize(
        &self,
        image: &PreparedImage,
        candidates: &[String],
    ) -> Result<Vec<f32>, RunnerError> {
        let encoded = encode_image(image);
        let response: CategorizeResponse = self
            .post(
                "categorize",
                &CategorizeRequest {
                    image: &encoded,
                    candidates,
                },
            )
            .await?;
        Ok(response.scores)
    }
}
