// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Export API endpoint module
//!
//! Provides POST /export for writing analysis results to JSON or PDF.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::export_handler;
pub use request::ExportRequest;
pub use response::ExportResponse;
