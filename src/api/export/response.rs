// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Export response types

use serde::{Deserialize, Serialize};

/// Name of the written report, used with GET /download/{filename}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportResponse {
    pub filename: String,
}
