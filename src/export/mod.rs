// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Report export (JSON and PDF) and download resolution

pub mod json;
pub mod pdf;

use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

use crate::analysis::result::AnalysisResult;

const FILE_PREFIX: &str = "visionai_analysis";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid format")]
    UnsupportedFormat(String),

    #[error("No data to export")]
    MissingData,

    #[error("Invalid analysis data: {0}")]
    InvalidData(String),

    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("PDF rendering error: {0}")]
    Pdf(String),
}

impl ExportError {
    /// Whether the caller sent something unusable (as opposed to a server
    /// failure)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ExportError::UnsupportedFormat(_)
                | ExportError::MissingData
                | ExportError::InvalidData(_)
        )
    }
}

/// Output document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "JSON"),
            ExportFormat::Pdf => write!(f, "PDF"),
        }
    }
}

/// A written report
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub filename: String,
    pub path: PathBuf,
}

/// Writes reports into, and serves them from, a single directory
#[derive(Debug, Clone)]
pub struct ExportService {
    dir: PathBuf,
}

impl ExportService {
    /// Create the service, creating `dir` if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ExportError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        info!("Export directory: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `result` in `format`
    ///
    /// Blocking; call from `spawn_blocking` inside async code.
    pub fn export(
        &self,
        result: &AnalysisResult,
        format: ExportFormat,
    ) -> Result<ExportedFile, ExportError> {
        let (file, handle) = self.reserve_file(format)?;
        let written = match format {
            ExportFormat::Json => json::write_json(result, handle),
            ExportFormat::Pdf => pdf::write_pdf(result, handle),
        };
        if let Err(e) = written {
            let _ = std::fs::remove_file(&file.path);
            return Err(e);
        }
        info!("Exported {} report {}", format, file.filename);
        Ok(file)
    }

    pub fn export_json(&self, result: &AnalysisResult) -> Result<ExportedFile, ExportError> {
        self.export(result, ExportFormat::Json)
    }

    pub fn export_pdf(&self, result: &AnalysisResult) -> Result<ExportedFile, ExportError> {
        self.export(result, ExportFormat::Pdf)
    }

    /// Create a new, timestamped file; an `_n` suffix is added when an
    /// export in the same millisecond already holds the name
    fn reserve_file(&self, format: ExportFormat) -> Result<(ExportedFile, File), ExportError> {
        let stamp = Local::now().format("%Y%m%d_%H%M%S_%3f").to_string();
        let mut n = 0u32;
        loop {
            let filename = if n == 0 {
                format!("{}_{}.{}", FILE_PREFIX, stamp, format.extension())
            } else {
                format!("{}_{}_{}.{}", FILE_PREFIX, stamp, n, format.extension())
            };
            let path = self.dir.join(&filename);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(handle) => return Ok((ExportedFile { filename, path }, handle)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Map a requested download name to a regular file inside the export
    /// directory; `None` for anything else
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        if !is_safe_filename(filename) {
            return None;
        }
        let path = self.dir.join(filename);
        if path.is_file() {
            Some(path)
        } else {
            None
        }
    }
}

/// A single normal path component with no separators
fn is_safe_filename(name: &str) -> bool {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains('\0') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Content type for a download by extension
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
