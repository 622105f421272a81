// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Upload bookkeeping on top of an [`ObjectStore`].
//!
//! Every upload gets a fresh UUID and is stored at `{prefix}{id}/{filename}`.
//! The key is the only record of an upload, so listing and lookup are
//! prefix scans.

use crate::error::{AppError, Result};
use crate::models::{CsvPreview, FileRecord};
use crate::services::csv_preview::preview_csv;
use crate::services::filename::secure_filename;
use crate::storage::{ObjectMeta, ObjectStore};
use axum::body::Bytes;
use std::sync::Arc;
use uuid::Uuid;

/// Largest preview a caller may request.
pub const MAX_PREVIEW_ROWS: usize = 500;

/// File operations shared by the HTTP handlers.
#[derive(Clone)]
pub struct FileService {
    store: Arc<dyn ObjectStore>,
    prefix: String,
    allowed_extensions: Vec<String>,
}

impl FileService {
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            allowed_extensions: Vec::new(),
        }
    }

    /// Restrict uploads to these lowercase extensions. Empty allows all.
    pub fn with_allowed_extensions(mut self, extensions: Vec<String>) -> Self {
        self.allowed_extensions = extensions;
        self
    }

    /// Parse a path id, rejecting anything that is not a UUID.
    pub fn parse_id(raw: &str) -> Result<Uuid> {
        Uuid::parse_str(raw)
            .map_err(|_| AppError::BadRequest(format!("Invalid file id: {raw}")))
    }

    fn extension_allowed(&self, filename: &str) -> bool {
        self.allowed_extensions.is_empty()
            || crate::services::filename::extension(filename)
                .is_some_and(|ext| self.allowed_extensions.contains(&ext))
    }

    fn record_from_meta(&self, meta: ObjectMeta) -> Option<FileRecord> {
        FileRecord::from_key(
            &self.prefix,
            &meta.key,
            meta.size,
            meta.content_type,
            meta.last_modified,
        )
    }

    /// Store a new upload and return its record.
    pub async fn upload(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<FileRecord> {
        let filename = secure_filename(original_name);
        if filename.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Filename {original_name:?} has no usable characters"
            )));
        }
        if !self.extension_allowed(&filename) {
            return Err(AppError::BadRequest(format!(
                "File type not allowed: {filename}"
            )));
        }
        if data.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        let id = Uuid::new_v4();
        let key = FileRecord::object_key(&self.prefix, &id, &filename);
        let size = data.len() as u64;

        self.store.put(&key, data, content_type).await?;

        tracing::info!(%id, key = %key, size, "File uploaded");

        // Report the store's own timestamp so the record matches later lookups.
        let stored = self.store.head(&key).await?;
        let uploaded_at = stored
            .as_ref()
            .and_then(|meta| meta.last_modified)
            .or_else(|| Some(chrono::Utc::now()));

        Ok(FileRecord {
            id: id.to_string(),
            filename,
            key,
            size,
            content_type: content_type.map(str::to_string),
            uploaded_at,
        })
    }

    /// All uploads, newest first.
    pub async fn list(&self) -> Result<Vec<FileRecord>> {
        let mut records: Vec<FileRecord> = self
            .store
            .list(&self.prefix)
            .await?
            .into_iter()
            .filter_map(|meta| self.record_from_meta(meta))
            .collect();

        records.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| a.key.cmp(&b.key))
        });
        Ok(records)
    }

    /// Look up one upload by id.
    pub async fn find(&self, id: &Uuid) -> Result<Option<FileRecord>> {
        let dir = format!("{}{id}/", self.prefix);
        let Some(meta) = self.store.list(&dir).await?.into_iter().next() else {
            return Ok(None);
        };

        // Listings omit the content type; head fills it in.
        let meta = self.store.head(&meta.key).await?.unwrap_or(meta);
        Ok(self.record_from_meta(meta))
    }

    async fn require(&self, id: &Uuid) -> Result<FileRecord> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File {id} not found")))
    }

    /// Fetch an upload's record and contents.
    pub async fn download(&self, id: &Uuid) -> Result<(FileRecord, Bytes)> {
        let mut record = self.require(id).await?;
        let object = self
            .store
            .get(&record.key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File {id} not found")))?;

        if object.content_type.is_some() {
            record.content_type = object.content_type;
        }
        Ok((record, object.data))
    }

    /// Remove every object stored under an upload's id.
    pub async fn delete(&self, id: &Uuid) -> Result<()> {
        let dir = format!("{}{id}/", self.prefix);
        let mut removed = 0usize;
        for meta in self.store.list(&dir).await? {
            if self.store.delete(&meta.key).await? {
                removed += 1;
            }
        }

        if removed == 0 {
            return Err(AppError::NotFound(format!("File {id} not found")));
        }
        tracing::info!(%id, removed, "File deleted");
        Ok(())
    }

    /// Parse a stored CSV upload and return its first `rows` rows.
    pub async fn preview(&self, id: &Uuid, rows: usize) -> Result<CsvPreview> {
        let (record, data) = self.download(id).await?;
        if !record.is_csv() {
            return Err(AppError::BadRequest(format!(
                "File {} is not a CSV file",
                record.filename
            )));
        }
        build_preview(&record, &data, rows)
    }
}

/// Preview for a record whose contents are already in hand.
pub fn build_preview(record: &FileRecord, data: &[u8], rows: usize) -> Result<CsvPreview> {
    let parsed = preview_csv(data, rows.min(MAX_PREVIEW_ROWS))?;
    let truncated = parsed.truncated();
    Ok(CsvPreview {
        id: record.id.clone(),
        filename: record.filename.clone(),
        headers: parsed.headers,
        rows: parsed.rows,
        total_rows: parsed.total_rows,
        truncated,
    })
}
