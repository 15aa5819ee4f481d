// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-model outcome used to isolate failures

use std::fmt::Display;

/// Result of one model call: real data, or a fallback plus the reason
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutcome<T> {
    Completed(T),
    Degraded { fallback: T, reason: String },
}

impl<T> ModelOutcome<T> {
    /// Wrap a fallible call, substituting `fallback` on error
    pub fn from_result<E: Display>(result: Result<T, E>, fallback: T) -> Self {
        match result {
            Ok(value) => ModelOutcome::Completed(value),
            Err(e) => ModelOutcome::Degraded {
                fallback,
                reason: e.to_string(),
            },
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ModelOutcome::Degraded { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ModelOutcome::Completed(_) => None,
            ModelOutcome::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            ModelOutcome::Completed(v) => v,
            ModelOutcome::Degraded { fallback, .. } => fallback,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            ModelOutcome::Completed(v) => v,
            ModelOutcome::Degraded { fallback, .. } => fallback,
        }
    }
}
