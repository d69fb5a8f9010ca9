//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources win key by key: defaults, then the global file, then workspace files,
//! then the environment.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("queue.page_size", 40)?
        .set_default("queue.sort_key", "title")?
        .set_default("queue.sort_direction", "asc")?
        .set_default("queue.discard_stale_responses", true)?
        .set_default("catalog.path", "scenes.json")
}
