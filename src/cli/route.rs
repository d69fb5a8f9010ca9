//! CLI route: single route table and run context. Dispatches to the queue, the session
//! and the scene controller, then to presentation.

use crate::catalog::{SceneCatalog, SORT_KEYS};
use crate::cli::help::command_name;
use crate::cli::parse::{Commands, SceneCommands, SourceArgs};
use crate::cli::presentation::{
    format_navigation, format_scene, format_window_json, format_window_text,
};
use crate::config::{ConfigLoader, SceneQueueConfig};
use crate::error::{ApiError, QueueError};
use crate::filter::{Predicate, SortDirection};
use crate::navigation::{RecordingNavigator, RouteBridge, RouteParams, SceneRoute};
use crate::queue::{QueueSource, QueueWindowManager};
use crate::scene::{Notice, SceneController};
use crate::session::SceneSession;
use crate::types::ItemId;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{debug, info};

/// Runtime context for CLI execution: workspace, effective config and the async runtime
/// queue operations run on.
pub struct RunContext {
    workspace_root: PathBuf,
    config: SceneQueueConfig,
    catalog_path: PathBuf,
    runtime: Runtime,
}

impl RunContext {
    /// Create run context from workspace root, optional config path and optional catalog
    /// override. The catalog itself is opened per command.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        catalog_path: Option<PathBuf>,
    ) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        let config = config.validated()?;
        let catalog_path = catalog_path.unwrap_or_else(|| config.catalog_path(&workspace_root));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            workspace_root,
            config,
            catalog_path,
            runtime,
        })
    }

    pub fn config(&self) -> &SceneQueueConfig {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        info!(command = %name, "Executing command");
        let result = self.execute_inner(command);
        debug!(
            command = %name,
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Window {
                source,
                more,
                less,
                format,
            } => self.handle_window(source, *more, *less, format),
            Commands::Next { source, current } => self.handle_step(source, current, true),
            Commands::Previous { source, current } => self.handle_step(source, current, false),
            Commands::Random { source, seed } => self.handle_random(source, *seed),
            Commands::Play {
                source,
                current,
                limit,
            } => self.handle_play(source, current, *limit),
            Commands::Scene { command } => self.handle_scene_command(command),
            Commands::Config { format } => self.handle_config(format),
        }
    }

    fn open_catalog(&self) -> Result<Arc<SceneCatalog>, ApiError> {
        Ok(Arc::new(SceneCatalog::open(&self.catalog_path)?))
    }

    fn queue_source(&self, args: &SourceArgs) -> Result<QueueSource, ApiError> {
        if let Some(ids) = &args.ids {
            let ids: Vec<ItemId> = ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(ItemId::from)
                .collect();
            if ids.is_empty() {
                return Err(QueueError::InvalidSpec("--ids needs at least one id".to_string()).into());
            }
            return Ok(QueueSource::Ids(ids));
        }

        let mut spec = self.config.queue.default_spec();
        if let Some(page_size) = args.page_size {
            spec.page_size = page_size;
        }
        if let Some(sort) = &args.sort {
            spec.sort_key = sort.clone();
        }
        if args.desc {
            spec.sort_direction = SortDirection::Desc;
        }
        if let Some(page) = args.page {
            spec.current_page = page;
        }

        let mut predicate = Predicate {
            query: args.query.clone(),
            ..Default::default()
        };
        if let Some(organized) = args.organized {
            predicate
                .criteria
                .insert("organized".to_string(), organized.to_string());
        }
        spec.predicate = predicate;

        spec.validate()?;
        if !SORT_KEYS.contains(&spec.sort_key.as_str()) {
            return Err(QueueError::InvalidSpec(format!(
                "unknown sort key '{}' (expected one of {})",
                spec.sort_key,
                SORT_KEYS.join(", ")
            ))
            .into());
        }
        Ok(QueueSource::Query(spec))
    }

    fn handle_window(
        &self,
        args: &SourceArgs,
        more: u32,
        less: u32,
        format: &str,
    ) -> Result<String, ApiError> {
        let source = self.queue_source(args)?;
        let manager = QueueWindowManager::new(self.open_catalog()?, Arc::new(RecordingNavigator::new()))
            .with_options(self.config.queue.queue_options());

        let state = self.runtime.block_on(async {
            manager.set_source(Some(source));
            manager.initialize().await;
            for _ in 0..less {
                manager.extend_backward().await;
            }
            for _ in 0..more {
                manager.extend_forward().await;
            }
            manager.state()
        });

        if format == "json" {
            format_window_json(&state)
        } else {
            Ok(format_window_text(&state))
        }
    }

    fn handle_step(&self, args: &SourceArgs, current: &str, forward: bool) -> Result<String, ApiError> {
        let source = self.queue_source(args)?;
        let (bridge, mut routes) = RouteBridge::new(Some(source.clone()));
        let manager = QueueWindowManager::new(self.open_catalog()?, Arc::new(bridge))
            .with_options(self.config.queue.queue_options());
        let current = ItemId::from(current);

        self.runtime.block_on(async {
            manager.set_source(Some(source));
            manager.initialize().await;
        });
        if forward {
            manager.navigate_next(&current);
        } else {
            manager.navigate_previous(&current);
        }

        let issued: Vec<SceneRoute> = routes.try_recv().into_iter().collect();
        let reason = if manager.index_of(&current).is_none() {
            "current scene is not in the queue window"
        } else {
            "no neighbor in the current window"
        };
        Ok(format_navigation(&issued, reason))
    }

    fn handle_random(&self, args: &SourceArgs, seed: Option<u64>) -> Result<String, ApiError> {
        let source = self.queue_source(args)?;
        let (bridge, mut routes) = RouteBridge::new(Some(source.clone()));
        let mut manager = QueueWindowManager::new(self.open_catalog()?, Arc::new(bridge))
            .with_options(self.config.queue.queue_options());
        if let Some(seed) = seed {
            manager = manager.with_seed(seed);
        }

        self.runtime.block_on(async {
            manager.set_source(Some(source));
            manager.initialize().await;
            manager.navigate_random().await;
        });

        let issued: Vec<SceneRoute> = routes.try_recv().into_iter().collect();
        Ok(format_navigation(&issued, "queue is empty or the pick missed"))
    }

    fn handle_play(&self, args: &SourceArgs, current: &str, limit: usize) -> Result<String, ApiError> {
        let source = self.queue_source(args)?;
        let mut session = SceneSession::new(self.open_catalog()?, self.config.queue.queue_options());
        let start = SceneRoute::new(ItemId::from(current))
            .with_queue(source)
            .with_params(RouteParams {
                autoplay: true,
                timestamp: 0,
            });

        let visited = self.runtime.block_on(async {
            let mut visited = vec![start.clone()];
            session.open(start).await;
            while visited.len() < limit {
                if session.on_playback_complete().is_none() {
                    break;
                }
                let Some(route) = session.pending_route() else {
                    break;
                };
                visited.push(route.clone());
                session.open(route).await;
            }
            session.close();
            visited
        });

        Ok(format_navigation(&visited, "nothing to play"))
    }

    fn handle_scene_command(&self, command: &SceneCommands) -> Result<String, ApiError> {
        let id = match command {
            SceneCommands::Show { id }
            | SceneCommands::OInc { id }
            | SceneCommands::ODec { id }
            | SceneCommands::OReset { id }
            | SceneCommands::Organize { id }
            | SceneCommands::Rescan { id }
            | SceneCommands::Screenshot { id, .. }
            | SceneCommands::Delete { id } => ItemId::from(id.as_str()),
        };
        let controller = SceneController::new(self.open_catalog()?);

        self.runtime.block_on(async {
            match controller.load(&id).await {
                Ok(true) => {}
                Ok(false) => return Err(ApiError::SceneNotFound(id.clone())),
                Err(e) => return Err(e),
            }

            let notice = match command {
                SceneCommands::Show { .. } => None,
                SceneCommands::OInc { .. } => controller.increment_o().await,
                SceneCommands::ODec { .. } => controller.decrement_o().await,
                SceneCommands::OReset { .. } => controller.reset_o().await,
                SceneCommands::Organize { .. } => controller.toggle_organized().await,
                SceneCommands::Rescan { .. } => controller.rescan().await,
                SceneCommands::Screenshot { at, .. } => controller.generate_screenshot(*at).await,
                SceneCommands::Delete { .. } => {
                    return match controller.delete().await {
                        Ok(Some(location)) => {
                            Ok(format!("Deleted scene {}; returning to {}", id, location))
                        }
                        Ok(None) => Err(ApiError::SceneNotFound(id.clone())),
                        Err(notice) => Err(notice_error(notice)),
                    };
                }
            };

            match notice {
                Some(Notice::Success(message)) => Ok(message),
                Some(notice @ Notice::Error(_)) => Err(notice_error(notice)),
                None => controller
                    .scene()
                    .map(|scene| format_scene(&scene))
                    .ok_or_else(|| ApiError::SceneNotFound(id.clone())),
            }
        })
    }

    fn handle_config(&self, format: &str) -> Result<String, ApiError> {
        if format == "json" {
            Ok(serde_json::to_string_pretty(&self.config)?)
        } else {
            toml::to_string_pretty(&self.config)
                .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))
        }
    }
}

fn notice_error(notice: Notice) -> ApiError {
    match notice {
        Notice::Error(message) | Notice::Success(message) => ApiError::MutationFailed(message),
    }
}
