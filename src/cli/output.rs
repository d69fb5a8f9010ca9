//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, QueueError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::SceneNotFound(id) => format!("Scene not found: {}", id),
        ApiError::CatalogError(msg) => {
            format!("Catalog error: {} (set catalog.path or pass --catalog)", msg)
        }
        ApiError::Queue(QueueError::InvalidSpec(msg)) => format!("Invalid queue options: {}", msg),
        other => other.to_string(),
    }
}
