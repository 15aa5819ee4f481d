// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::config::{AppConfig, ModelBackend};

/// VisionAI node
#[derive(Parser, Debug, Default)]
#[command(name = "visionai-node")]
#[command(version = crate::version::VERSION)]
#[command(about = "Local image analysis server (captioning, classification, detection, scene matching)", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "VISIONAI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Model backend: sidecar or mock
    #[arg(long)]
    pub backend: Option<ModelBackend>,

    /// Base URL of the inference sidecar
    #[arg(long)]
    pub sidecar_url: Option<String>,

    /// Sidecar request timeout in seconds
    #[arg(long)]
    pub sidecar_timeout_secs: Option<u64>,

    /// Directory for exported reports
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Front-end directory served at /
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

impl Cli {
    /// Resolve the effective configuration: file, then environment, then flags
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_toml_file(path)?,
            None => AppConfig::default(),
        };
        config.apply_env();
        self.apply(&mut config);
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    /// Override `config` with any flags given on the command line
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(url) = &self.sidecar_url {
            config.sidecar_url = url.clone();
        }
        if let Some(secs) = self.sidecar_timeout_secs {
            config.sidecar_timeout_secs = secs;
        }
        if let Some(dir) = &self.export_dir {
            config.export_dir = dir.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.static_dir = Some(dir.clone());
        }
    }
}
