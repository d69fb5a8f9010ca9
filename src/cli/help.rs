//! CLI help and command-name contract for logging.

use crate::cli::parse::{Commands, SceneCommands};

/// Command name string for log records (e.g. "window", "scene.o_inc").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Window { .. } => "window".to_string(),
        Commands::Next { .. } => "next".to_string(),
        Commands::Previous { .. } => "previous".to_string(),
        Commands::Random { .. } => "random".to_string(),
        Commands::Play { .. } => "play".to_string(),
        Commands::Scene { command } => format!("scene.{}", scene_command_name(command)),
        Commands::Config { .. } => "config".to_string(),
    }
}

pub fn scene_command_name(command: &SceneCommands) -> &'static str {
    match command {
        SceneCommands::Show { .. } => "show",
        SceneCommands::OInc { .. } => "o_inc",
        SceneCommands::ODec { .. } => "o_dec",
        SceneCommands::OReset { .. } => "o_reset",
        SceneCommands::Organize { .. } => "organize",
        SceneCommands::Rescan { .. } => "rescan",
        SceneCommands::Screenshot { .. } => "screenshot",
        SceneCommands::Delete { .. } => "delete",
    }
}
