//! Scene Actions
//!
//! Mutations the scene view can dispatch against the backend (O-counter, organized flag,
//! rescan, screenshot, delete) and a controller that tracks in-flight actions and turns
//! their results into user-facing notices.

use crate::error::ApiError;
use crate::types::{ItemId, ItemRef};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Location to return to after the current scene has been deleted
pub const SCENES_LOCATION: &str = "/scenes";

/// Full scene record as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub id: ItemId,
    #[serde(default)]
    pub title: Option<String>,
    pub path: String,
    #[serde(default)]
    pub o_counter: u32,
    #[serde(default)]
    pub organized: bool,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
}

impl SceneRecord {
    pub fn new(id: impl Into<ItemId>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            path: path.into(),
            o_counter: 0,
            organized: false,
            duration: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn item_ref(&self) -> ItemRef {
        ItemRef::new(self.id.clone(), self.title.clone(), self.path.clone())
    }
}

#[async_trait]
pub trait SceneService: Send + Sync {
    async fn find_scene(&self, id: &ItemId) -> Result<Option<SceneRecord>, ApiError>;

    /// Returns the new counter value.
    async fn increment_o(&self, id: &ItemId) -> Result<u32, ApiError>;

    async fn decrement_o(&self, id: &ItemId) -> Result<u32, ApiError>;

    async fn reset_o(&self, id: &ItemId) -> Result<u32, ApiError>;

    async fn set_organized(&self, id: &ItemId, organized: bool) -> Result<SceneRecord, ApiError>;

    /// Queue a metadata scan of the given paths.
    async fn rescan(&self, paths: &[String]) -> Result<(), ApiError>;

    /// Queue screenshot generation, optionally at a timestamp in seconds.
    async fn generate_screenshot(&self, id: &ItemId, at: Option<f64>) -> Result<(), ApiError>;

    async fn delete(&self, ids: &[ItemId]) -> Result<(), ApiError>;
}

/// Message for the user after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    fn error(err: ApiError) -> Self {
        warn!(error = %err, "Scene action failed");
        Notice::Error(err.to_string())
    }

    fn success(message: impl Into<String>) -> Self {
        let message = message.into();
        info!(message = %message, "Scene action succeeded");
        Notice::Success(message)
    }
}

/// Clears an in-flight flag when the action finishes, however it finishes.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct SceneController {
    service: Arc<dyn SceneService>,
    scene: RwLock<Option<SceneRecord>>,
    o_loading: AtomicBool,
    organized_loading: AtomicBool,
}

impl SceneController {
    pub fn new(service: Arc<dyn SceneService>) -> Self {
        Self {
            service,
            scene: RwLock::new(None),
            o_loading: AtomicBool::new(false),
            organized_loading: AtomicBool::new(false),
        }
    }

    /// Load the scene to operate on. Returns false when it does not exist.
    pub async fn load(&self, id: &ItemId) -> Result<bool, ApiError> {
        let scene = self.service.find_scene(id).await?;
        let found = scene.is_some();
        *self.scene.write() = scene;
        Ok(found)
    }

    pub fn scene(&self) -> Option<SceneRecord> {
        self.scene.read().clone()
    }

    pub fn is_o_loading(&self) -> bool {
        self.o_loading.load(Ordering::SeqCst)
    }

    pub fn is_organized_loading(&self) -> bool {
        self.organized_loading.load(Ordering::SeqCst)
    }

    fn current_id(&self) -> Option<ItemId> {
        self.scene.read().as_ref().map(|scene| scene.id.clone())
    }

    pub async fn increment_o(&self) -> Option<Notice> {
        let id = self.current_id()?;
        let _flight = InFlight::start(&self.o_loading);
        let result = self.service.increment_o(&id).await;
        self.apply_o_counter(result)
    }

    pub async fn decrement_o(&self) -> Option<Notice> {
        let id = self.current_id()?;
        let _flight = InFlight::start(&self.o_loading);
        let result = self.service.decrement_o(&id).await;
        self.apply_o_counter(result)
    }

    pub async fn reset_o(&self) -> Option<Notice> {
        let id = self.current_id()?;
        let _flight = InFlight::start(&self.o_loading);
        let result = self.service.reset_o(&id).await;
        self.apply_o_counter(result)
    }

    fn apply_o_counter(&self, result: Result<u32, ApiError>) -> Option<Notice> {
        match result {
            Ok(count) => {
                if let Some(scene) = self.scene.write().as_mut() {
                    scene.o_counter = count;
                }
                None
            }
            Err(e) => Some(Notice::error(e)),
        }
    }

    pub async fn toggle_organized(&self) -> Option<Notice> {
        let (id, organized) = {
            let scene = self.scene.read();
            let scene = scene.as_ref()?;
            (scene.id.clone(), scene.organized)
        };
        let _flight = InFlight::start(&self.organized_loading);
        match self.service.set_organized(&id, !organized).await {
            Ok(updated) => {
                *self.scene.write() = Some(updated);
                None
            }
            Err(e) => Some(Notice::error(e)),
        }
    }

    pub async fn rescan(&self) -> Option<Notice> {
        let path = self.scene.read().as_ref()?.path.clone();
        Some(match self.service.rescan(&[path]).await {
            Ok(()) => Notice::success("Rescanning 1 scene"),
            Err(e) => Notice::error(e),
        })
    }

    pub async fn generate_screenshot(&self, at: Option<f64>) -> Option<Notice> {
        let id = self.current_id()?;
        Some(match self.service.generate_screenshot(&id, at).await {
            Ok(()) => Notice::success("Generating screenshot"),
            Err(e) => Notice::error(e),
        })
    }

    /// Delete the loaded scene. On success the scene is unloaded and the location to
    /// redirect to is returned.
    pub async fn delete(&self) -> Result<Option<&'static str>, Notice> {
        let Some(id) = self.current_id() else {
            return Ok(None);
        };
        match self.service.delete(std::slice::from_ref(&id)).await {
            Ok(()) => {
                info!(scene_id = %id, "Scene deleted");
                *self.scene.write() = None;
                Ok(Some(SCENES_LOCATION))
            }
            Err(e) => Err(Notice::error(e)),
        }
    }
}
