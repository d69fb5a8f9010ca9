//! CLI parse: clap types for scene-queue. No behavior; definitions only.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// scene-queue CLI - browse and play a windowed scene queue
#[derive(Parser)]
#[command(name = "scene-queue")]
#[command(about = "Windowed play queue over a scene catalog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Scene catalog file (overrides catalog.path from config)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Where a queue comes from: a paged query or an explicit id list.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Comma-separated scene ids, played in the given order
    #[arg(long, conflicts_with_all = ["page", "page_size", "sort", "desc", "query", "organized"])]
    pub ids: Option<String>,

    /// 1-based page to materialize
    #[arg(long)]
    pub page: Option<u32>,

    /// Items per page (defaults to queue.page_size)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Sort key: id, title, path, o_counter, duration
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, default_value = "false")]
    pub desc: bool,

    /// Free-text filter on title and path
    #[arg(long)]
    pub query: Option<String>,

    /// Only organized (true) or unorganized (false) scenes
    #[arg(long)]
    pub organized: Option<bool>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the materialized queue window
    Window {
        #[command(flatten)]
        source: SourceArgs,
        /// Load this many pages after the window
        #[arg(long, default_value = "0")]
        more: u32,
        /// Load this many pages before the window
        #[arg(long, default_value = "0")]
        less: u32,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Navigate to the item after the current one
    Next {
        #[command(flatten)]
        source: SourceArgs,
        /// Current scene id
        #[arg(long)]
        current: String,
    },
    /// Navigate to the item before the current one
    Previous {
        #[command(flatten)]
        source: SourceArgs,
        /// Current scene id
        #[arg(long)]
        current: String,
    },
    /// Navigate to a random item of the queue
    Random {
        #[command(flatten)]
        source: SourceArgs,
        /// Seed for reproducible picks
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Autoplay through the queue starting at the current scene
    Play {
        #[command(flatten)]
        source: SourceArgs,
        /// Scene to start from
        #[arg(long)]
        current: String,
        /// Stop after this many scenes
        #[arg(long, default_value = "100")]
        limit: usize,
    },
    /// Scene actions
    Scene {
        #[command(subcommand)]
        command: SceneCommands,
    },
    /// Show the effective configuration
    Config {
        /// Output format (toml or json)
        #[arg(long, default_value = "toml")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum SceneCommands {
    /// Show one scene
    Show { id: String },
    /// Increment the O-counter
    OInc { id: String },
    /// Decrement the O-counter
    ODec { id: String },
    /// Reset the O-counter
    OReset { id: String },
    /// Toggle the organized flag
    Organize { id: String },
    /// Queue a metadata rescan of the scene file
    Rescan { id: String },
    /// Queue screenshot generation
    Screenshot {
        id: String,
        /// Timestamp in seconds (defaults to the server's choice)
        #[arg(long)]
        at: Option<f64>,
    },
    /// Delete the scene from the catalog
    Delete { id: String },
}
