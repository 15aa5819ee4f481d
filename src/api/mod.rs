// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analyze;
pub mod download;
pub mod errors;
pub mod export;
pub mod health;
pub mod http_server;
pub mod response;

pub use errors::ApiError;
pub use http_server::{create_app, start_server, AppState};
pub use response::ApiResponse;
