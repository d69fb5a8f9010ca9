//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the queue and catalog.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::{command_name, scene_command_name};
pub use output::map_error;
pub use parse::{Cli, Commands, SceneCommands, SourceArgs};
pub use presentation::{format_navigation, format_scene, format_window_json, format_window_text};
pub use route::RunContext;
