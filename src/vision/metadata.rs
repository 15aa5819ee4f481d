// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Basic image metadata reported alongside every analysis

use image::ColorType;
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use super::image_utils::{decode_image_bytes, detect_format, format_name, ImageError};

/// Image metadata extracted from the original upload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    /// Container format name (PNG, JPEG, ...)
    pub format: String,
    /// Color mode (RGB, RGBA, L, ...)
    #[serde(alias = "color_mode")]
    pub mode: String,
    pub size_bytes: usize,
    pub size_kb: f64,
    pub size_mb: f64,
    /// Width / height, 0 when height is 0
    pub aspect_ratio: f64,
    /// Present (and true) only when the file carries EXIF fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_exif: Option<bool>,
}

impl ImageMetadata {
    /// Ordered (property, value) rows for tabular rendering, excluding the
    /// EXIF flag
    pub fn display_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Width", self.width.to_string()),
            ("Height", self.height.to_string()),
            ("Format", self.format.clone()),
            ("Mode", self.mode.clone()),
            ("Size Bytes", self.size_bytes.to_string()),
            ("Size Kb", format_decimal(self.size_kb)),
            ("Size Mb", format_decimal(self.size_mb)),
            ("Aspect Ratio", format_decimal(self.aspect_ratio)),
        ]
    }
}

/// Extract metadata from the original (pre-optimization) bytes
pub fn extract_metadata(bytes: &[u8]) -> Result<ImageMetadata, ImageError> {
    let format = detect_format(bytes)?;
    let image = decode_image_bytes(bytes)?;

    let width = image.width();
    let height = image.height();
    let size_bytes = bytes.len();

    Ok(ImageMetadata {
        width,
        height,
        format: format_name(format).to_string(),
        mode: color_mode(image.color()).to_string(),
        size_bytes,
        size_kb: round2(size_bytes as f64 / 1024.0),
        size_mb: round2(size_bytes as f64 / (1024.0 * 1024.0)),
        aspect_ratio: if height > 0 {
            round2(width as f64 / height as f64)
        } else {
            0.0
        },
        has_exif: if has_exif(bytes) { Some(true) } else { None },
    })
}

/// Color mode name for a decoded color type
pub fn color_mode(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "L;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGB;F",
        ColorType::Rgba32F => "RGBA;F",
        _ => "RGB",
    }
}

fn has_exif(bytes: &[u8]) -> bool {
    let mut cursor = Cursor::new(bytes);
    match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif.fields().next().is_some(),
        Err(_) => false,
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render a float the way the report tables show it: whole numbers keep a
/// trailing `.0`
pub fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
