// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Remote image download for URL-based analysis requests

use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::image_utils::{validate_image, ImageError};
use crate::config::defaults::{MAX_FILE_SIZE, URL_FETCH_TIMEOUT_SECS};

/// Fetches images over HTTP(S)
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    pub fn new() -> Result<Self, ImageError> {
        Self::with_timeout(Duration::from_secs(URL_FETCH_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ImageError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImageError::DownloadFailed(e.to_string()))?;
        Ok(Self { client })
    }

    /// Download and validate an image
    ///
    /// Rejects non-http(s) URLs, non-success statuses, non-image content
    /// types and bodies that fail image validation.
    pub async fn download(&self, raw_url: &str) -> Result<Vec<u8>, ImageError> {
        let url = parse_image_url(raw_url)?;
        debug!("Fetching image from {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_request_error)?;

        let response = response.error_for_status().map_err(map_request_error)?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();
        if !content_type.contains("image") {
            warn!("URL {} returned content type '{}'", url, content_type);
            return Err(ImageError::NotAnImage);
        }

        if let Some(len) = response.content_length() {
            if len as usize > MAX_FILE_SIZE {
                return Err(ImageError::TooLarge(len as usize, MAX_FILE_SIZE));
            }
        }

        let bytes = read_limited(response).await?;
        validate_image(&bytes)?;

        Ok(bytes)
    }
}

/// Read the body chunk by chunk, stopping once it passes the size limit
async fn read_limited(mut response: reqwest::Response) -> Result<Vec<u8>, ImageError> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(map_request_error)? {
        if body.len() + chunk.len() > MAX_FILE_SIZE {
            warn!("Download exceeded {} bytes, aborting", MAX_FILE_SIZE);
            return Err(ImageError::TooLarge(body.len() + chunk.len(), MAX_FILE_SIZE));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Parse and restrict a user-supplied URL to http/https
pub fn parse_image_url(raw_url: &str) -> Result<Url, ImageError> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err(ImageError::InvalidUrl("URL is empty".to_string()));
    }

    let url = Url::parse(trimmed).map_err(|e| ImageError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ImageError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            other
        ))),
    }
}

fn map_request_error(e: reqwest::Error) -> ImageError {
    if e.is_timeout() {
        ImageError::Timeout
    } else {
        ImageError::DownloadFailed(e.to_string())
    }
}
