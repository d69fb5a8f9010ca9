//! Config loader: assembles the layered sources into a [`SceneQueueConfig`].

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::SceneQueueConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// `config/config.toml`, workspace `config/{SCENE_QUEUE_ENV}.toml`, environment.
    pub fn load(workspace_root: &Path) -> Result<SceneQueueConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: SceneQueueConfig = builder.build()?.try_deserialize()?;
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(config)
    }

    /// Load configuration from one explicit file, on top of the defaults.
    pub fn load_from_file(path: &Path) -> Result<SceneQueueConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let config: SceneQueueConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Path of the global config file, if one can be determined.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Built-in defaults only.
    pub fn defaults() -> Result<SceneQueueConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .build()?
            .try_deserialize()
    }
}
