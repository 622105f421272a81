// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory object store.

use super::{ObjectMeta, ObjectStore, StorageError, StoredObject};
use async_trait::async_trait;
use axum::body::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

#[derive(Debug, Clone)]
struct Entry {
    data: Bytes,
    content_type: Option<String>,
    last_modified: DateTime<Utc>,
}

impl Entry {
    fn meta(&self, key: &str) -> ObjectMeta {
        ObjectMeta {
            key: key.to_string(),
            size: self.data.len() as u64,
            last_modified: Some(self.last_modified),
            content_type: self.content_type.clone(),
        }
    }

    /// Listing entry; like S3 listings, it carries no content type.
    fn list_meta(&self, key: &str) -> ObjectMeta {
        ObjectMeta {
            content_type: None,
            ..self.meta(key)
        }
    }
}

/// Object store held in a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: DashMap<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Store an object with an explicit modification time.
    pub fn insert_at(
        &self,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
        last_modified: DateTime<Utc>,
    ) {
        self.objects.insert(
            key.to_string(),
            Entry {
                data,
                content_type: content_type.map(str::to_string),
                last_modified,
            },
        );
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        self.insert_at(key, data, content_type, Utc::now());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StorageError> {
        Ok(self.objects.get(key).map(|entry| StoredObject {
            data: entry.data.clone(),
            content_type: entry.content_type.clone(),
        }))
    }

    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>, StorageError> {
        Ok(self.objects.get(key).map(|entry| entry.meta(key)))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StorageError> {
        let mut out: Vec<ObjectMeta> = self
            .objects
            .iter()
            .filter(|item| item.key().starts_with(prefix))
            .map(|item| item.value().list_meta(item.key()))
            .collect();
        out.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(out)
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.objects.remove(key).is_some())
    }
}
