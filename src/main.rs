// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! bucketdrop API Server
//!
//! Accepts file uploads over HTTP and keeps them in an S3 bucket.

use bucketdrop::{
    config::{Config, StorageBackend},
    services::FileService,
    storage::{MemoryStore, ObjectStore, S3Store},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting bucketdrop API");

    // Initialize object store
    let store: Arc<dyn ObjectStore> = match config.storage_backend {
        StorageBackend::S3 => Arc::new(S3Store::from_config(&config).await),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; uploads are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let files = FileService::new(store, config.upload_prefix.clone())
        .with_allowed_extensions(config.allowed_extensions.clone());
    tracing::info!(
        prefix = %config.upload_prefix,
        max_upload_bytes = config.max_upload_bytes,
        "File service initialized"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        files,
    });

    // Build router
    let app = bucketdrop::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bucketdrop=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
