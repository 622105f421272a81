// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Object storage layer.
//!
//! Handlers talk to an [`ObjectStore`]; production runs against S3 and
//! tests (or local runs without a bucket) use [`MemoryStore`].

pub mod memory;
pub mod s3;

pub use memory::MemoryStore;
pub use s3::S3Store;

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::{DateTime, Utc};

/// Metadata for one stored object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMeta {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    /// Only filled in by `head`; S3 listings don't carry it.
    pub content_type: Option<String>,
}

/// An object's contents.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: Option<String>,
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{operation} failed for {key}: {message}")]
    Backend {
        operation: &'static str,
        key: String,
        message: String,
    },

    #[error("failed to read body of {key}: {message}")]
    Body { key: String, message: String },
}

impl StorageError {
    pub(crate) fn backend(
        operation: &'static str,
        key: &str,
        err: impl std::fmt::Display,
    ) -> Self {
        StorageError::Backend {
            operation,
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

/// Minimal object store used by the file service.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object, replacing any existing one.
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), StorageError>;

    /// Read an object; `None` if it doesn't exist.
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StorageError>;

    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>, StorageError>;

    /// All objects whose key starts with `prefix`, in key order.
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StorageError>;

    /// Delete an object. Returns whether it existed.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;
}
