//! Configuration System
//!
//! Layered configuration for the queue, the catalog and logging. Values come from
//! built-in defaults, the global config file, workspace config files and `SCENE_QUEUE__`
//! environment variables, in that order of precedence.

use crate::error::ApiError;
use crate::filter::{OrderedCollectionSpec, SortDirection};
use crate::logging::LoggingConfig;
use crate::queue::QueueOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::environment::ENV_PREFIX;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneQueueConfig {
    #[serde(default)]
    pub queue: QueueConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for paged queues and window behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_sort_key")]
    pub sort_key: String,

    #[serde(default)]
    pub sort_direction: SortDirection,

    /// Drop responses superseded by a newer request
    #[serde(default = "default_true")]
    pub discard_stale_responses: bool,
}

fn default_page_size() -> u32 {
    40
}

fn default_sort_key() -> String {
    "title".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sort_key: default_sort_key(),
            sort_direction: SortDirection::default(),
            discard_stale_responses: true,
        }
    }
}

impl QueueConfig {
    /// Spec for the first page using the configured sort and page size.
    pub fn default_spec(&self) -> OrderedCollectionSpec {
        OrderedCollectionSpec::new(self.sort_key.clone(), self.page_size)
            .with_direction(self.sort_direction)
    }

    pub fn queue_options(&self) -> QueueOptions {
        QueueOptions {
            discard_stale_responses: self.discard_stale_responses,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 {
            return Err("Page size must be at least 1".to_string());
        }
        if self.sort_key.trim().is_empty() {
            return Err("Sort key cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Location of the scene catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("scenes.json")
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Queue(String),
    Catalog(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Queue(msg) => write!(f, "Queue: {}", msg),
            ValidationError::Catalog(msg) => write!(f, "Catalog: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl SceneQueueConfig {
    /// Validate the entire configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.queue.validate() {
            errors.push(ValidationError::Queue(e));
        }
        if self.catalog.path.as_os_str().is_empty() {
            errors.push(ValidationError::Catalog(
                "Catalog path cannot be empty".to_string(),
            ));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding all problems into one error.
    pub fn validated(self) -> Result<Self, ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }

    /// Catalog path, relative paths resolved against the workspace root.
    pub fn catalog_path(&self, workspace_root: &Path) -> PathBuf {
        if self.catalog.path.is_absolute() {
            self.catalog.path.clone()
        } else {
            workspace_root.join(&self.catalog.path)
        }
    }
}
