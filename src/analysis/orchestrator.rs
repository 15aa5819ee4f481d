// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analysis orchestrator
//!
//! Runs the four capabilities in a fixed order (captions, labels, objects,
//! scenes). Each call is isolated: a failing model contributes its fallback
//! and the rest of the analysis proceeds.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::normalize::{dedupe_captions, merge_detections, normalize_labels, rank_scenes};
use super::outcome::ModelOutcome;
use super::result::{AnalysisResult, DetectedObject, Label, ModelInfo, SceneCategory};
use super::summary::{calculate_statistics, generate_summary};
use super::vocabulary::scene_candidates;
use crate::config::defaults::{CAPTION_FALLBACK, CONFIDENCE_THRESHOLD, MAX_LABELS};
use crate::vision::metadata::ImageMetadata;
use crate::vision::preprocessing::PreparedImage;
use crate::vision::runner::{CaptionParams, ModelKind, ModelRunner, RunnerError};

/// Combines model outputs into an [`AnalysisResult`]
pub struct VisionAnalyzer {
    runner: Arc<dyn ModelRunner>,
}

impl VisionAnalyzer {
    pub fn new(runner: Arc<dyn ModelRunner>) -> Self {
        Self { runner }
    }

    pub fn device(&self) -> String {
        self.runner.device()
    }

    /// Analyze a prepared image
    ///
    /// Never fails: degraded models are logged and replaced by fallbacks.
    pub async fn analyze(&self, image: &PreparedImage, metadata: ImageMetadata) -> AnalysisResult {
        let start = Instant::now();
        info!(
            "Starting analysis of {}x{} image",
            image.width(),
            image.height()
        );

        let captions = self.generate_captions(image).await;
        report(ModelKind::Captioning, &captions, |c| c.len());

        let labels = self.classify(image).await;
        report(ModelKind::Classification, &labels, |l| l.len());

        let objects = self.detect_objects(image).await;
        report(ModelKind::Detection, &objects, |o| o.len());

        let scenes = self.match_scenes(image).await;
        report(ModelKind::SceneMatching, &scenes, |s| s.len());

        let captions = captions.into_value();
        let labels = labels.into_value();
        let objects = objects.into_value();
        let scenes = scenes.into_value();

        let summary = generate_summary(&captions, &labels, &objects, &scenes);
        let statistics = calculate_statistics(&labels, &objects, &scenes);

        info!("Analysis completed in {}ms", start.elapsed().as_millis());

        AnalysisResult {
            summary,
            statistics,
            captions,
            labels,
            objects,
            scene_analysis: scenes,
            metadata,
            model_info: ModelInfo::for_device(&self.runner.device()),
        }
    }

    async fn generate_captions(&self, image: &PreparedImage) -> ModelOutcome<Vec<String>> {
        let fallback = vec![CAPTION_FALLBACK.to_string()];
        ModelOutcome::from_result(self.caption_presets(image).await, fallback)
    }

    /// One caption per preset; any failure fails the whole set
    async fn caption_presets(&self, image: &PreparedImage) -> Result<Vec<String>, RunnerError> {
        let mut raw = Vec::new();
        for params in CaptionParams::presets() {
            raw.push(self.runner.caption(image, &params).await?);
        }
        let captions = dedupe_captions(raw);
        if captions.is_empty() {
            return Err(RunnerError::Malformed("all captions were empty".to_string()));
        }
        Ok(captions)
    }

    async fn classify(&self, image: &PreparedImage) -> ModelOutcome<Vec<Label>> {
        let result = self
            .runner
            .classify(image, MAX_LABELS)
            .await
            .map(normalize_labels);
        ModelOutcome::from_result(result, Vec::new())
    }

    async fn detect_objects(&self, image: &PreparedImage) -> ModelOutcome<Vec<DetectedObject>> {
        let result = self
            .runner
            .detect(image, CONFIDENCE_THRESHOLD)
            .await
            .map(merge_detections);
        ModelOutcome::from_result(result, Vec::new())
    }

    async fn match_scenes(&self, image: &PreparedImage) -> ModelOutcome<Vec<SceneCategory>> {
        let candidates = scene_candidates();
        let result = match self.runner.categorize(image, &candidates).await {
            Ok(scores) => rank_scenes(&candidates, &scores),
            Err(e) => Err(e),
        };
        ModelOutcome::from_result(result, Vec::new())
    }
}

fn report<T>(kind: ModelKind, outcome: &ModelOutcome<T>, count: impl Fn(&T) -> usize) {
    match outcome.reason() {
        Some(reason) => warn!("⚠️ {} degraded: {}", kind, reason),
        None => debug!("{}: {} results", kind, count(outcome.value())),
    }
}
