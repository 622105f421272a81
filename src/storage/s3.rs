// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! S3 object store built on `aws-sdk-s3`.
//!
//! Credentials come from the standard AWS provider chain (env vars, profile,
//! instance metadata). A custom endpoint and path-style addressing make it
//! usable against MinIO or LocalStack.

use super::{ObjectMeta, ObjectStore, StorageError, StoredObject};
use crate::config::Config;
use async_trait::async_trait;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::{ByteStream, DateTime as SmithyDateTime};
use aws_sdk_s3::Client;
use axum::body::Bytes;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;

const MAX_PUT_ATTEMPTS: u32 = 3;
const INITIAL_RETRY_DELAY_MS: u64 = 100;

/// S3-backed object store for a single bucket.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Build a client from the AWS environment plus the service config.
    pub async fn from_config(config: &Config) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.s3_force_path_style);
        if let Some(endpoint) = &config.s3_endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        tracing::info!(
            bucket = %config.s3_bucket,
            region = %config.aws_region,
            endpoint = config.s3_endpoint.as_deref().unwrap_or("default"),
            "S3 client configured"
        );

        Self::new(Client::from_conf(builder.build()), config.s3_bucket.clone())
    }

    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

/// Whether an S3 call failed in a way worth retrying: timeouts, connection
/// and response-parsing failures, and 5xx responses.
fn is_transient<E>(err: &SdkError<E, HttpResponse>) -> bool {
    match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            true
        }
        SdkError::ServiceError(ctx) => ctx.raw().status().is_server_error(),
        _ => false,
    }
}

/// Run `operation`, retrying transient failures with exponential backoff.
async fn with_retry<T, E, F, Fut>(
    operation_name: &'static str,
    retryable: impl Fn(&E) -> bool,
    operation: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::error::Error + 'static,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < MAX_PUT_ATTEMPTS && retryable(&e) => {
                let delay_ms = INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt - 1);
                tracing::warn!(
                    operation = operation_name,
                    attempt,
                    delay_ms,
                    error = %DisplayErrorContext(&e),
                    "Retrying S3 operation"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

fn to_chrono(ts: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
}

fn to_size(len: Option<i64>) -> u64 {
    len.and_then(|n| u64::try_from(n).ok()).unwrap_or(0)
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), StorageError> {
        with_retry("put_object", is_transient, || {
            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(key)
                .set_content_type(content_type.map(str::to_string))
                .body(ByteStream::from(data.clone()))
                .send()
        })
        .await
        .map_err(|e| StorageError::backend("put_object", key, DisplayErrorContext(&e)))?;

        tracing::debug!(bucket = %self.bucket, key, size = data.len(), "Stored object");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StorageError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) if err.as_service_error().is_some_and(|e| e.is_no_such_key()) => {
                return Ok(None)
            }
            Err(err) => {
                return Err(StorageError::backend(
                    "get_object",
                    key,
                    DisplayErrorContext(&err),
                ))
            }
        };

        let content_type = output.content_type().map(str::to_string);
        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Body {
                key: key.to_string(),
                message: e.to_string(),
            })?
            .into_bytes();

        Ok(Some(StoredObject { data, content_type }))
    }

    async fn head(&self, key: &str) -> Result<Option<ObjectMeta>, StorageError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => Ok(Some(ObjectMeta {
                key: key.to_string(),
                size: to_size(output.content_length()),
                last_modified: output.last_modified().and_then(to_chrono),
                content_type: output.content_type().map(str::to_string),
            })),
            Err(err) if err.as_service_error().is_some_and(|e| e.is_not_found()) => Ok(None),
            Err(err) => Err(StorageError::backend(
                "head_object",
                key,
                DisplayErrorContext(&err),
            )),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StorageError> {
        let mut objects = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let resp = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| {
                    StorageError::backend("list_objects_v2", prefix, DisplayErrorContext(&e))
                })?;

            for object in resp.contents() {
                let Some(key) = object.key() else { continue };
                objects.push(ObjectMeta {
                    key: key.to_string(),
                    size: to_size(object.size()),
                    last_modified: object.last_modified().and_then(to_chrono),
                    content_type: None,
                });
            }

            match resp.next_continuation_token() {
                Some(token) if resp.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        tracing::debug!(bucket = %self.bucket, prefix, count = objects.len(), "Listed objects");
        Ok(objects)
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        // DeleteObject succeeds for missing keys, so check first.
        if self.head(key).await?.is_none() {
            return Ok(false);
        }

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::backend("delete_object", key, DisplayErrorContext(&e)))?;

        tracing::debug!(bucket = %self.bucket, key, "Deleted object");
        Ok(true)
    }
}
