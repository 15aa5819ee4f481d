// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! JSON report writer

use chrono::Local;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};

use super::ExportError;
use crate::analysis::result::{
    AnalysisResult, DetectedObject, Label, ModelInfo, SceneCategory, Statistics,
};
use crate::vision::metadata::ImageMetadata;

/// On-disk layout; field order is the serialized order
#[derive(Serialize)]
struct ExportDocument<'a> {
    timestamp: String,
    summary: &'a str,
    captions: &'a [String],
    statistics: &'a Statistics,
    labels: &'a [Label],
    objects: &'a [DetectedObject],
    scene_analysis: &'a [SceneCategory],
    metadata: &'a ImageMetadata,
    model_info: &'a ModelInfo,
}

impl<'a> ExportDocument<'a> {
    fn new(result: &'a AnalysisResult) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            summary: &result.summary,
            captions: &result.captions,
            statistics: &result.statistics,
            labels: &result.labels,
            objects: &result.objects,
            scene_analysis: &result.scene_analysis,
            metadata: &result.metadata,
            model_info: &result.model_info,
        }
    }
}

/// Write `result` as pretty-printed JSON into `file`
pub fn write_json(result: &AnalysisResult, file: File) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &ExportDocument::new(result))?;
    writer.flush()?;
    Ok(())
}
