// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Runtime configuration for the VisionAI node
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `VISIONAI_*` environment variables. The binary applies CLI flags last.

pub mod defaults;

use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which model runner serves the four vision capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// HTTP inference sidecar
    Sidecar,
    /// Deterministic in-process runner (demos, tests)
    Mock,
}

impl FromStr for ModelBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sidecar" => Ok(ModelBackend::Sidecar),
            "mock" => Ok(ModelBackend::Mock),
            other => Err(format!(
                "unknown model backend '{}', expected 'sidecar' or 'mock'",
                other
            )),
        }
    }
}

impl fmt::Display for ModelBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelBackend::Sidecar => write!(f, "sidecar"),
            ModelBackend::Mock => write!(f, "mock"),
        }
    }
}

/// Server and model configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Model runner selection
    pub backend: ModelBackend,
    /// Base URL of the inference sidecar
    pub sidecar_url: String,
    /// Per-request timeout for sidecar calls
    pub sidecar_timeout_secs: u64,
    /// Directory that receives exported reports
    pub export_dir: PathBuf,
    /// Front-end assets served at `/` when the directory exists
    pub static_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            backend: ModelBackend::Sidecar,
            sidecar_url: "http://127.0.0.1:8001".to_string(),
            sidecar_timeout_secs: 120,
            export_dir: env::temp_dir().join("visionai_exports"),
            static_dir: Some(PathBuf::from("./frontend")),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load a TOML file; missing keys keep their defaults
    pub fn from_toml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config {}: {}", path.display(), e))?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(raw)?;
        Ok(config)
    }

    /// Overlay `VISIONAI_*` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(host) = env::var("VISIONAI_HOST") {
            self.host = host;
        }
        if let Some(port) = env::var("VISIONAI_PORT").ok().and_then(|v| v.parse().ok()) {
            self.port = port;
        }
        if let Some(backend) = env::var("VISIONAI_BACKEND")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.backend = backend;
        }
        if let Ok(url) = env::var("VISIONAI_SIDECAR_URL") {
            self.sidecar_url = url;
        }
        if let Some(timeout) = env::var("VISIONAI_SIDECAR_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.sidecar_timeout_secs = timeout;
        }
        if let Ok(dir) = env::var("VISIONAI_EXPORT_DIR") {
            self.export_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("VISIONAI_STATIC_DIR") {
            self.static_dir = if dir.is_empty() {
                None
            } else {
                Some(PathBuf::from(dir))
            };
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port must be greater than 0".to_string());
        }
        if self.backend == ModelBackend::Sidecar {
            if self.sidecar_url.trim().is_empty() {
                return Err("Sidecar URL must not be empty".to_string());
            }
            if url::Url::parse(&self.sidecar_url).is_err() {
                return Err(format!("Sidecar URL is not a valid URL: {}", self.sidecar_url));
            }
        }
        if self.sidecar_timeout_secs == 0 {
            return Err("Sidecar timeout must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
