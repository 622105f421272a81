// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! bucketdrop: upload, list and fetch files kept in an S3 bucket
//!
//! This crate provides a small HTTP API in front of an object store.
//! Uploaded files are stored under a fresh UUID with a sanitized name,
//! and CSV uploads can be previewed as JSON.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;

use config::Config;
use services::FileService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub files: FileService,
}
