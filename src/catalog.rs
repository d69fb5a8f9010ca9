//! Scene Catalog
//!
//! In-process stand-in for the media server: a list of scene records, optionally backed
//! by a JSON file, that answers queue reads and applies scene mutations. Scans and
//! screenshot generation are recorded as pending jobs.

use crate::error::{ApiError, QueueError};
use crate::filter::{OrderedCollectionSpec, Predicate, SortDirection};
use crate::remote::CollectionSource;
use crate::scene::{SceneRecord, SceneService};
use crate::types::{ItemId, ItemRef, Page};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sort keys understood by the catalog
pub const SORT_KEYS: &[&str] = &["id", "title", "path", "o_counter", "duration"];

/// Work queued by a mutation that the catalog does not perform itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogJob {
    Scan { paths: Vec<String> },
    Screenshot { id: ItemId, at: Option<f64> },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    scenes: Vec<SceneRecord>,
    #[serde(default)]
    jobs: Vec<CatalogJob>,
}

pub struct SceneCatalog {
    scenes: RwLock<Vec<SceneRecord>>,
    jobs: Mutex<Vec<CatalogJob>>,
    path: Option<PathBuf>,
}

impl SceneCatalog {
    pub fn new(scenes: Vec<SceneRecord>) -> Self {
        Self {
            scenes: RwLock::new(scenes),
            jobs: Mutex::new(Vec::new()),
            path: None,
        }
    }

    /// Load a catalog file. Mutations are written back to the same file.
    pub fn open(path: &Path) -> Result<Self, ApiError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ApiError::CatalogError(format!("Failed to read catalog {}: {}", path.display(), e))
        })?;
        let file: CatalogFile = serde_json::from_str(&content)?;
        debug!(path = %path.display(), scenes = file.scenes.len(), "Catalog loaded");
        Ok(Self {
            scenes: RwLock::new(file.scenes),
            jobs: Mutex::new(file.jobs),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn len(&self) -> usize {
        self.scenes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.read().is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<SceneRecord> {
        self.scenes.read().iter().find(|s| &s.id == id).cloned()
    }

    pub fn jobs(&self) -> Vec<CatalogJob> {
        self.jobs.lock().clone()
    }

    /// Write the catalog back to its file, if it has one.
    pub fn save(&self) -> Result<(), ApiError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = CatalogFile {
            scenes: self.scenes.read().clone(),
            jobs: self.jobs.lock().clone(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, content).map_err(|e| {
            ApiError::CatalogError(format!("Failed to write catalog {}: {}", path.display(), e))
        })
    }

    fn update<T>(
        &self,
        id: &ItemId,
        change: impl FnOnce(&mut SceneRecord) -> T,
    ) -> Result<T, ApiError> {
        let value = {
            let mut scenes = self.scenes.write();
            let scene = scenes
                .iter_mut()
                .find(|s| &s.id == id)
                .ok_or_else(|| ApiError::SceneNotFound(id.clone()))?;
            change(scene)
        };
        self.save()?;
        Ok(value)
    }

    fn push_job(&self, job: CatalogJob) -> Result<(), ApiError> {
        info!(job = ?job, "Catalog job queued");
        self.jobs.lock().push(job);
        self.save()
    }
}

fn satisfies(scene: &SceneRecord, predicate: &Predicate) -> Result<bool, QueueError> {
    if let Some(query) = predicate.query.as_deref().filter(|q| !q.is_empty()) {
        let query = query.to_lowercase();
        let in_title = scene
            .title
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains(&query));
        if !in_title && !scene.path.to_lowercase().contains(&query) {
            return Ok(false);
        }
    }

    for (key, value) in &predicate.criteria {
        let keep = match key.as_str() {
            "organized" => {
                let wanted: bool = value.parse().map_err(|_| {
                    QueueError::InvalidSpec(format!("organized must be true or false, got '{}'", value))
                })?;
                scene.organized == wanted
            }
            "path_prefix" => scene.path.starts_with(value.as_str()),
            "min_o_counter" => {
                let min: u32 = value.parse().map_err(|_| {
                    QueueError::InvalidSpec(format!("min_o_counter must be a number, got '{}'", value))
                })?;
                scene.o_counter >= min
            }
            other => {
                return Err(QueueError::InvalidSpec(format!("unknown criterion '{}'", other)));
            }
        };
        if !keep {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Numeric ids compare numerically, anything else lexically.
fn compare_ids(a: &ItemId, b: &ItemId) -> Ordering {
    match (a.as_str().parse::<u64>(), b.as_str().parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

fn compare(a: &SceneRecord, b: &SceneRecord, sort_key: &str) -> Ordering {
    let primary = match sort_key {
        "title" => a
            .item_ref()
            .display_name()
            .to_lowercase()
            .cmp(&b.item_ref().display_name().to_lowercase()),
        "path" => a.path.cmp(&b.path),
        "o_counter" => a.o_counter.cmp(&b.o_counter),
        "duration" => a
            .duration
            .unwrap_or(0.0)
            .total_cmp(&b.duration.unwrap_or(0.0)),
        _ => Ordering::Equal,
    };
    primary.then_with(|| compare_ids(&a.id, &b.id))
}

#[async_trait]
impl CollectionSource for SceneCatalog {
    async fn fetch_page(&self, spec: &OrderedCollectionSpec) -> Result<Page, QueueError> {
        spec.validate()?;
        if !SORT_KEYS.contains(&spec.sort_key.as_str()) {
            return Err(QueueError::InvalidSpec(format!(
                "unknown sort key '{}'",
                spec.sort_key
            )));
        }

        let scenes = self.scenes.read();
        let mut selected = Vec::new();
        for scene in scenes.iter() {
            if satisfies(scene, &spec.predicate)? {
                selected.push(scene);
            }
        }
        selected.sort_by(|a, b| {
            let ordering = compare(a, b, &spec.sort_key);
            match spec.sort_direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total_count = selected.len() as u64;
        let skip = usize::try_from(spec.window_start() - 1).unwrap_or(usize::MAX);
        let items: Vec<ItemRef> = selected
            .into_iter()
            .skip(skip)
            .take(spec.page_size as usize)
            .map(SceneRecord::item_ref)
            .collect();
        debug!(
            page = spec.current_page,
            returned = items.len(),
            total_count,
            "Catalog page served"
        );
        Ok(Page::new(items, total_count))
    }

    async fn fetch_by_ids(&self, ids: &[ItemId]) -> Result<Page, QueueError> {
        let scenes = self.scenes.read();
        let items: Vec<ItemRef> = ids
            .iter()
            .filter_map(|id| scenes.iter().find(|s| &s.id == id))
            .map(SceneRecord::item_ref)
            .collect();
        let total_count = items.len() as u64;
        Ok(Page::new(items, total_count))
    }
}

#[async_trait]
impl SceneService for SceneCatalog {
    async fn find_scene(&self, id: &ItemId) -> Result<Option<SceneRecord>, ApiError> {
        Ok(self.get(id))
    }

    async fn increment_o(&self, id: &ItemId) -> Result<u32, ApiError> {
        self.update(id, |scene| {
            scene.o_counter = scene.o_counter.saturating_add(1);
            scene.o_counter
        })
    }

    async fn decrement_o(&self, id: &ItemId) -> Result<u32, ApiError> {
        self.update(id, |scene| {
            scene.o_counter = scene.o_counter.saturating_sub(1);
            scene.o_counter
        })
    }

    async fn reset_o(&self, id: &ItemId) -> Result<u32, ApiError> {
        self.update(id, |scene| {
            scene.o_counter = 0;
            0
        })
    }

    async fn set_organized(&self, id: &ItemId, organized: bool) -> Result<SceneRecord, ApiError> {
        self.update(id, |scene| {
            scene.organized = organized;
            scene.clone()
        })
    }

    async fn rescan(&self, paths: &[String]) -> Result<(), ApiError> {
        self.push_job(CatalogJob::Scan {
            paths: paths.to_vec(),
        })
    }

    async fn generate_screenshot(&self, id: &ItemId, at: Option<f64>) -> Result<(), ApiError> {
        if self.get(id).is_none() {
            return Err(ApiError::SceneNotFound(id.clone()));
        }
        self.push_job(CatalogJob::Screenshot { id: id.clone(), at })
    }

    async fn delete(&self, ids: &[ItemId]) -> Result<(), ApiError> {
        {
            let mut scenes = self.scenes.write();
            if let Some(missing) = ids.iter().find(|id| !scenes.iter().any(|s| &s.id == *id)) {
                return Err(ApiError::SceneNotFound(missing.clone()));
            }
            scenes.retain(|s| !ids.contains(&s.id));
        }
        info!(count = ids.len(), "Scenes deleted");
        self.save()
    }
}
