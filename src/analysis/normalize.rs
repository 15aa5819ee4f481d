// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Converts raw model output into ranked, display-ready lists
//!
//! Raw scores are on the 0-1 scale; everything leaving this module is a
//! percentage rounded to two decimals and sorted descending.

use std::collections::HashMap;

use super::result::{DetectedObject, Label, SceneCategory};
use crate::config::defaults::{
    CONFIDENCE_THRESHOLD, MAX_CAPTIONS, MAX_LABELS, MAX_OBJECTS, SCENE_TOP_K,
};
use crate::vision::metadata::round2;
use crate::vision::runner::{Detection, RunnerError, ScoredLabel};

/// Raw score to percent, two decimals
pub fn to_percent(score: f32) -> f64 {
    round2(score as f64 * 100.0)
}

/// Title-case every word: a letter is upper-cased when it follows a
/// non-letter, lower-cased otherwise
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(c);
            prev_letter = false;
        }
    }
    out
}

/// First character upper-cased, the rest lower-cased
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Trim, drop blanks and duplicates (first occurrence wins), cap the count
pub fn dedupe_captions(raw: Vec<String>) -> Vec<String> {
    let mut captions: Vec<String> = Vec::with_capacity(raw.len());
    for caption in raw {
        let caption = caption.trim().to_string();
        if caption.is_empty() || captions.contains(&caption) {
            continue;
        }
        captions.push(caption);
    }
    captions.truncate(MAX_CAPTIONS);
    captions
}

fn label_display(raw: &str) -> String {
    title_case(&raw.replace('_', " "))
}

/// Threshold, rank and reformat classifier predictions
pub fn normalize_labels(predictions: Vec<ScoredLabel>) -> Vec<Label> {
    let mut kept: Vec<ScoredLabel> = predictions
        .into_iter()
        .filter(|p| p.score >= CONFIDENCE_THRESHOLD)
        .collect();
    kept.sort_by(|a, b| b.score.total_cmp(&a.score));
    kept.truncate(MAX_LABELS);

    kept.into_iter()
        .map(|p| Label {
            description: label_display(&p.label),
            confidence: to_percent(p.score),
        })
        .collect()
}

/// Merge detections by class into counted entries
///
/// Each entry keeps the highest raw score among its instances.
pub fn merge_detections(detections: Vec<Detection>) -> Vec<DetectedObject> {
    let mut order: Vec<(String, u32, f32)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for det in detections {
        if det.score < CONFIDENCE_THRESHOLD {
            continue;
        }
        let name = label_display(&det.label);
        match index.get(&name) {
            Some(&i) => {
                let entry = &mut order[i];
                entry.1 += 1;
                entry.2 = entry.2.max(det.score);
            }
            None => {
                index.insert(name.clone(), order.len());
                order.push((name, 1, det.score));
            }
        }
    }

    order.sort_by(|a, b| b.2.total_cmp(&a.2));
    order.truncate(MAX_OBJECTS);

    order
        .into_iter()
        .map(|(name, count, score)| DetectedObject {
            name,
            count,
            confidence: to_percent(score),
        })
        .collect()
}

/// Pair candidate phrases with their scores and keep the best matches
///
/// A score vector that does not line up with the candidates is malformed.
pub fn rank_scenes(
    candidates: &[String],
    scores: &[f32],
) -> Result<Vec<SceneCategory>, RunnerError> {
    if candidates.len() != scores.len() {
        return Err(RunnerError::Malformed(format!(
            "expected {} scene scores, got {}",
            candidates.len(),
            scores.len()
        )));
    }

    let mut pairs: Vec<(&String, f32)> = candidates
        .iter()
        .zip(scores.iter().copied())
        .filter(|(_, score)| *score >= CONFIDENCE_THRESHOLD)
        .collect();
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
    pairs.truncate(SCENE_TOP_K);

    Ok(pairs
        .into_iter()
        .map(|(phrase, score)| SceneCategory {
            category: title_case(phrase),
            confidence: to_percent(score),
        })
        .collect())
}
