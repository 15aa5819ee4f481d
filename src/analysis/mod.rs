// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image analysis: model orchestration, normalization, summary and
//! statistics

pub mod normalize;
pub mod orchestrator;
pub mod outcome;
pub mod result;
pub mod summary;
pub mod vocabulary;

pub use orchestrator::VisionAnalyzer;
pub use outcome::ModelOutcome;
pub use result::{AnalysisResult, DetectedObject, Label, ModelInfo, SceneCategory, Statistics};
pub use summary::{calculate_statistics, generate_summary};
pub use vocabulary::SCENE_VOCABULARY;
