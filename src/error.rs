//! Error types for the scene queue.

use crate::types::ItemId;
use thiserror::Error;

/// Queue-level errors
///
/// These never escape the window manager: a failed fetch is logged and the window is
/// left empty (initialize) or unchanged (extend). Remote sources return them.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Invalid collection spec: {0}")]
    InvalidSpec(String),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("Queue closed")]
    Closed,
}

/// Top-level errors for config, catalog, mutations and the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("Mutation failed: {0}")]
    MutationFailed(String),

    #[error("Scene not found: {0}")]
    SceneNotFound(ItemId),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
