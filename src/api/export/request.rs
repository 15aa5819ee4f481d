// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Export request types and validation

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::export::{ExportError, ExportFormat};

fn default_format() -> String {
    "json".to_string()
}

/// Request to write an analysis result to a report file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    /// "json" or "pdf", case-insensitive
    #[serde(default = "default_format")]
    pub format: String,

    /// Analysis result as previously returned by /analyze
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl ExportRequest {
    /// Validate and split into the target format and the result document
    ///
    /// Missing or empty data is checked before the format.
    pub fn validate(self) -> Result<(ExportFormat, AnalysisResult), ExportError> {
        let data = match self.data {
            None | Some(serde_json::Value::Null) => return Err(ExportError::MissingData),
            Some(serde_json::Value::Object(map)) if map.is_empty() => {
                return Err(ExportError::MissingData)
            }
            Some(value) => value,
        };

        let format: ExportFormat = self.format.parse()?;
        let result: AnalysisResult = serde_json::from_value(data)
            .map_err(|e| ExportError::InvalidData(e.to_string()))?;
        Ok((format, result))
    }
}
