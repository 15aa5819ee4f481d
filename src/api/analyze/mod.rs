// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze API endpoint module
//!
//! Provides POST /analyze for running the full vision pipeline on one image.

pub mod handler;
pub mod request;

pub use handler::analyze_handler;
pub use request::{AnalyzeRequest, ImageSource};
