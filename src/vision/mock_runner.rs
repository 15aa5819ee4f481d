// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Deterministic in-process model runner
//!
//! Used by the `mock` backend (local development without the inference
//! sidecar) and by the test suites.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::preprocessing::PreparedImage;
use super::runner::{CaptionParams, Detection, ModelKind, ModelRunner, RunnerError, ScoredLabel};

/// Canned-output runner
#[derive(Debug, Default)]
pub struct MockModelRunner {
    device: String,
    captions: Vec<String>,
    labels: Vec<ScoredLabel>,
    detections: Vec<Detection>,
    category_scores: HashMap<String, f32>,
    failing: HashSet<ModelKind>,
    calls: AtomicUsize,
    caption_cursor: AtomicUsize,
}

impl MockModelRunner {
    /// Runner that produces nothing and never fails
    pub fn new() -> Self {
        Self {
            device: "cpu".to_string(),
            ..Default::default()
        }
    }

    /// Runner with plausible output for a dog in a park
    pub fn demo() -> Self {
        Self::new()
            .with_captions(&[
                "a dog sitting on the grass in a park",
                "a golden retriever resting on a lawn on a sunny day",
                "a happy dog enjoying the outdoors",
            ])
            .with_labels(vec![
                ScoredLabel::new("golden_retriever", 0.82),
                ScoredLabel::new("Labrador_retriever", 0.09),
                ScoredLabel::new("tennis_ball", 0.03),
            ])
            .with_detections(vec![
                Detection::new("dog", 0.98),
                Detection::new("frisbee", 0.71),
            ])
            .with_category_score("outdoor scene", 0.41)
            .with_category_score("nature", 0.22)
            .with_category_score("animals", 0.18)
    }

    pub fn with_device(mut self, device: &str) -> Self {
        self.device = device.to_string();
        self
    }

    pub fn with_captions(mut self, captions: &[&str]) -> Self {
        self.captions = captions.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_labels(mut self, labels: Vec<ScoredLabel>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_detections(mut self, detections: Vec<Detection>) -> Self {
        self.detections = detections;
        self
    }

    /// Score returned for one candidate phrase; unlisted phrases score 0
    pub fn with_category_score(mut self, phrase: &str, score: f32) -> Self {
        self.category_scores.insert(phrase.to_string(), score);
        self
    }

    /// Make every call for `kind` fail
    pub fn failing(mut self, kind: ModelKind) -> Self {
        self.failing.insert(kind);
        self
    }

    /// Total number of model invocations so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, kind: ModelKind) -> Result<(), RunnerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&kind) {
            return Err(RunnerError::Unavailable(format!("{} disabled", kind)));
        }
        Ok(())
    }
}

#[async_trait]
impl ModelRunner for MockModelRunner {
    fn device(&self) -> String {
        self.device.clone()
    }

    async fn caption(
        &self,
        _image: &PreparedImage,
        _params: &CaptionParams,
    ) -> Result<String, RunnerError> {
        self.enter(ModelKind::Captioning)?;
        if self.captions.is_empty() {
            return Ok(String::new());
        }
        let idx = self.caption_cursor.fetch_add(1, Ordering::SeqCst) % self.captions.len();
        Ok(self.captions[idx].clone())
    }

    async fn classify(
        &self,
        _image: &PreparedImage,
        top_k: usize,
    ) -> Result<Vec<ScoredLabel>, RunnerError> {
        self.enter(ModelKind::Classification)?;
        let mut labels = self.labels.clone();
        labels.sort_by(|a, b| b.score.total_cmp(&a.score));
        labels.truncate(top_k);
        Ok(labels)
    }

    async fn detect(
        &self,
        _image: &PreparedImage,
        threshold: f32,
    ) -> Result<Vec<Detection>, RunnerError> {
        self.enter(ModelKind::Detection)?;
        Ok(self
            .detections
            .iter()
            .filter(|d| d.score >= threshold)
            .cloned()
            .collect())
    }

    async fn categorize(
        &self,
        _image: &PreparedImage,
        candidates: &[String],
    ) -> Result<Vec<f32>, RunnerError> {
        self.enter(ModelKind::SceneMatching)?;
        Ok(candidates
            .iter()
            .map(|c| self.category_scores.get(c).copied().unwrap_or(0.0))
            .collect())
    }
}
