// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Normalizes uploaded images before they reach the models
//!
//! Every model sees the same input: three-channel RGB, transparency
//! flattened onto white, larger side capped at [`MAX_IMAGE_DIMENSION`],
//! re-encoded as JPEG.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use tracing::{debug, warn};

use super::image_utils::{decode_image_bytes, ImageError};
use crate::config::defaults::{IMAGE_QUALITY, MAX_IMAGE_DIMENSION};

/// Image ready for inference
#[derive(Debug, Clone)]
pub struct PreparedImage {
    /// Decoded RGB image
    pub image: DynamicImage,
    /// Re-encoded JPEG bytes (or the original bytes if re-encoding failed)
    pub encoded: Vec<u8>,
}

impl PreparedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Optimize an image for model input
///
/// Only an undecodable input is an error. If JPEG encoding fails the RGB
/// image is kept and paired with the original bytes.
pub fn optimize_image(bytes: &[u8]) -> Result<PreparedImage, ImageError> {
    let decoded = decode_image_bytes(bytes)?;
    let (orig_w, orig_h) = decoded.dimensions();

    let mut rgb = DynamicImage::ImageRgb8(to_rgb(&decoded));

    if orig_w.max(orig_h) > MAX_IMAGE_DIMENSION {
        rgb = rgb.resize(MAX_IMAGE_DIMENSION, MAX_IMAGE_DIMENSION, FilterType::Lanczos3);
        debug!(
            "Downsampled image {}x{} -> {}x{}",
            orig_w,
            orig_h,
            rgb.width(),
            rgb.height()
        );
    }

    match encode_jpeg(&rgb, IMAGE_QUALITY) {
        Ok(encoded) => Ok(PreparedImage {
            image: rgb,
            encoded,
        }),
        Err(e) => {
            warn!("Image re-encoding failed, using original bytes: {}", e);
            Ok(PreparedImage {
                image: rgb,
                encoded: bytes.to_vec(),
            })
        }
    }
}

/// Convert to RGB, compositing any alpha channel over white
fn to_rgb(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Encode as JPEG at the given quality
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, ImageError> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    image
        .write_with_encoder(encoder)
        .map_err(|e| ImageError::EncodeFailed(e.to_string()))?;
    Ok(buf)
}
