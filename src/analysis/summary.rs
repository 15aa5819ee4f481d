// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Natural-language summary and aggregate statistics

use super::normalize::capitalize;
use super::result::{DetectedObject, Label, SceneCategory, Statistics};
use crate::config::defaults::SUMMARY_FALLBACK;
use crate::vision::metadata::round2;

/// Build the summary paragraph from the four result lists
pub fn generate_summary(
    captions: &[String],
    labels: &[Label],
    objects: &[DetectedObject],
    scenes: &[SceneCategory],
) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(first) = captions.first() {
        let mut sentence = capitalize(first.trim());
        if !sentence.is_empty() {
            if !sentence.ends_with('.') {
                sentence.push('.');
            }
            parts.push(sentence);
        }
    }

    if !objects.is_empty() {
        let names: Vec<String> = objects.iter().take(3).map(|o| o.name.to_lowercase()).collect();
        if objects.len() == 1 {
            parts.push(format!("Contains {} {}.", objects[0].count, names[0]));
        } else {
            parts.push(format!("Contains {}.", join_with_and(&names)));
        }
    }

    if !scenes.is_empty() {
        let names: Vec<String> = scenes
            .iter()
            .take(2)
            .map(|s| s.category.to_lowercase())
            .collect();
        parts.push(format!("Scene appears to be {}.", names.join(" and ")));
    }

    if parts.is_empty() && !labels.is_empty() {
        let names: Vec<String> = labels
            .iter()
            .take(3)
            .map(|l| l.description.to_lowercase())
            .collect();
        parts.push(format!("Image features: {}.", names.join(", ")));
    }

    if parts.is_empty() {
        return SUMMARY_FALLBACK.to_string();
    }
    parts.join(" ")
}

/// "a", "a and b", "a, b and c"
fn join_with_and(items: &[String]) -> String {
    match items.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

/// Derive statistics from the ranked lists
pub fn calculate_statistics(
    labels: &[Label],
    objects: &[DetectedObject],
    scenes: &[SceneCategory],
) -> Statistics {
    let mut stats = Statistics::default();

    if !objects.is_empty() {
        stats.total_objects = Some(objects.iter().map(|o| o.count).sum());
        stats.unique_objects = Some(objects.len());
        stats.most_common = Some(objects[0].name.clone());
    }

    if !labels.is_empty() {
        let sum: f64 = labels.iter().map(|l| l.confidence).sum();
        stats.avg_confidence = Some(round2(sum / labels.len() as f64));
        stats.top_confidence = labels
            .iter()
            .map(|l| l.confidence)
            .max_by(|a, b| a.total_cmp(b));
    }

    if !scenes.is_empty() {
        stats.scene_matches = Some(scenes.len());
    }

    stats
}
