//! Workspace config files: `config/config.toml`, then `config/{SCENE_QUEUE_ENV}.toml`.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_SELECTOR: &str = "SCENE_QUEUE_ENV";

/// Workspace config files that exist, lowest precedence first.
pub fn workspace_config_paths(workspace_root: &Path) -> Vec<PathBuf> {
    let config_dir = workspace_root.join("config");
    let mut candidates = vec![config_dir.join("config.toml")];
    if let Some(env_name) = std::env::var(ENV_SELECTOR).ok().filter(|name| !name.is_empty()) {
        candidates.push(config_dir.join(format!("{}.toml", env_name)));
    }
    candidates.into_iter().filter(|path| path.is_file()).collect()
}

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(workspace_config_paths(workspace_root)
        .into_iter()
        .fold(builder, |builder, path| {
            debug!(config_path = %path.display(), "Layering workspace configuration");
            builder.add_source(File::from(path).required(true))
        }))
}
