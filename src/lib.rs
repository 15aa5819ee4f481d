// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod export;
pub mod version;
pub mod vision;

pub use analysis::{AnalysisResult, VisionAnalyzer};
pub use api::{create_app, AppState};
pub use config::{AppConfig, ModelBackend};
pub use export::{ExportFormat, ExportService};
pub use vision::{ModelRunner, VisionModelManager};
