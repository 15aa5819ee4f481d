// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze request types and validation

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::vision::image_utils::validate_extension;

/// JSON body for URL and base64 submissions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// "url" or "base64"
    #[serde(rename = "type", default)]
    pub source_type: Option<String>,

    /// The URL, or the base64 payload (data-URI prefix allowed)
    #[serde(default)]
    pub data: Option<String>,
}

/// Where the image bytes come from
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Upload { filename: String, bytes: Bytes },
    Url(String),
    Base64(String),
}

impl AnalyzeRequest {
    /// Validate the JSON body and select the image source
    pub fn into_source(self) -> Result<ImageSource, ApiError> {
        let data = self.data.unwrap_or_default();
        match self.source_type.as_deref() {
            Some("url") => Ok(ImageSource::Url(data)),
            Some("base64") => Ok(ImageSource::Base64(data)),
            _ => Err(ApiError::InvalidRequest("Invalid request type".to_string())),
        }
    }
}

impl ImageSource {
    /// Validate an uploaded file part
    pub fn upload(filename: Option<&str>, bytes: Bytes) -> Result<Self, ApiError> {
        let filename = filename.unwrap_or_default();
        if filename.is_empty() {
            return Err(ApiError::InvalidRequest("No file selected".to_string()));
        }
        if !validate_extension(filename) {
            return Err(ApiError::InvalidRequest("Invalid file type".to_string()));
        }
        Ok(ImageSource::Upload {
            filename: filename.to_string(),
            bytes,
        })
    }

    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Upload { filename, bytes } => {
                format!("upload '{}' ({} bytes)", filename, bytes.len())
            }
            ImageSource::Url(url) => format!("url {}", url),
            ImageSource::Base64(data) => format!("base64 payload ({} chars)", data.len()),
        }
    }
}
