// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod csv_preview;
pub mod filename;
pub mod files;

pub use filename::secure_filename;
pub use files::FileService;
