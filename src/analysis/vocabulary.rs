// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Candidate phrases for scene/category matching

/// Fixed phrase vocabulary scored by the scene model
pub const SCENE_VOCABULARY: [&str; 33] = [
    "indoor scene",
    "outdoor scene",
    "landscape",
    "cityscape",
    "portrait",
    "nature photography",
    "urban environment",
    "underwater scene",
    "daytime",
    "nighttime",
    "sunset",
    "sunrise",
    "bright lighting",
    "dark atmosphere",
    "dramatic lighting",
    "natural light",
    "professional photography",
    "artistic composition",
    "minimalist style",
    "vibrant colors",
    "black and white",
    "vintage style",
    "modern design",
    "people",
    "animals",
    "food",
    "technology",
    "architecture",
    "transportation",
    "sports",
    "nature",
    "art",
    "fashion",
];

/// Owned copy of the vocabulary, in order
pub fn scene_candidates() -> Vec<String> {
    SCENE_VOCABULARY.iter().map(|s| s.to_string()).collect()
}
