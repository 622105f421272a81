// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod file;
pub mod preview;

pub use file::{FileList, FileRecord, UploadResponse};
pub use preview::CsvPreview;
