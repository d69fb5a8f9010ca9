//! Shared test utilities for integration tests
//!
//! Scene catalog fixtures, a remote source with controllable latency, and a serialized
//! environment guard for tests that touch config variables.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex as SyncMutex;
use scene_queue::catalog::SceneCatalog;
use scene_queue::error::QueueError;
use scene_queue::filter::OrderedCollectionSpec;
use scene_queue::remote::CollectionSource;
use scene_queue::scene::SceneRecord;
use scene_queue::types::{ItemId, ItemRef, Page};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;
use tokio::sync::oneshot;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ENV_KEYS: &[&str] = &[
    "HOME",
    "XDG_CONFIG_HOME",
    "SCENE_QUEUE_ENV",
    "SCENE_QUEUE__QUEUE__PAGE_SIZE",
    "SCENE_QUEUE__QUEUE__SORT_KEY",
    "SCENE_QUEUE__CATALOG__PATH",
];

/// Run `f` with HOME and XDG_CONFIG_HOME pointed into `test_dir`, every scene-queue
/// variable cleared, and `vars` applied. The original environment is restored afterwards.
pub fn with_env<F, R>(test_dir: &TempDir, vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(&str, Option<String>)> = ENV_KEYS
        .iter()
        .map(|key| (*key, std::env::var(key).ok()))
        .collect();

    let home = test_dir.path().join("home");
    let xdg = test_dir.path().join("xdg");
    std::fs::create_dir_all(&home).unwrap();
    std::fs::create_dir_all(&xdg).unwrap();
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
    std::env::set_var("HOME", &home);
    std::env::set_var("XDG_CONFIG_HOME", &xdg);
    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let result = f();

    for (key, value) in saved {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
    result
}

/// Scenes 1..=count with zero-padded titles, so title order equals id order.
pub fn scenes(count: u64) -> Vec<SceneRecord> {
    (1..=count)
        .map(|i| {
            SceneRecord::new(i, format!("/media/scene_{:03}.mp4", i))
                .with_title(format!("Scene {:03}", i))
        })
        .collect()
}

pub fn catalog(count: u64) -> SceneCatalog {
    SceneCatalog::new(scenes(count))
}

/// Write a catalog file of `count` scenes and return its path.
pub fn write_catalog(dir: &Path, count: u64) -> PathBuf {
    let path = dir.join("scenes.json");
    let body = serde_json::json!({ "scenes": scenes(count) });
    std::fs::write(&path, serde_json::to_string_pretty(&body).unwrap()).unwrap();
    path
}

pub fn ids(items: &[ItemRef]) -> Vec<String> {
    items.iter().map(|item| item.id.to_string()).collect()
}

/// Remote source over ids 1..=total whose page fetches can be held until released.
///
/// Every fetch for a held page parks on a oneshot; `release` answers the oldest parked
/// fetch for that page.
pub struct GatedSource {
    total: u64,
    held: SyncMutex<Vec<u32>>,
    waiting: SyncMutex<HashMap<u32, Vec<oneshot::Sender<()>>>>,
    fetches: AtomicUsize,
}

impl GatedSource {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            held: SyncMutex::new(Vec::new()),
            waiting: SyncMutex::new(HashMap::new()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn hold(&self, page: u32) {
        self.held.lock().push(page);
    }

    /// Number of fetches currently parked for `page`.
    pub fn parked(&self, page: u32) -> usize {
        self.waiting.lock().get(&page).map_or(0, Vec::len)
    }

    pub fn release(&self, page: u32) -> bool {
        let sender = self
            .waiting
            .lock()
            .get_mut(&page)
            .filter(|senders| !senders.is_empty())
            .map(|senders| senders.remove(0));
        sender.is_some_and(|sender| sender.send(()).is_ok())
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn page(&self, spec: &OrderedCollectionSpec) -> Page {
        let start = spec.window_start();
        let end = (start + spec.page_size as u64 - 1).min(self.total);
        let items = (start..=end)
            .map(|i| ItemRef::new(i, None, format!("/media/{}.mp4", i)))
            .collect();
        Page::new(items, self.total)
    }
}

#[async_trait]
impl CollectionSource for GatedSource {
    async fn fetch_page(&self, spec: &OrderedCollectionSpec) -> Result<Page, QueueError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.held.lock().contains(&spec.current_page) {
            let (tx, rx) = oneshot::channel();
            self.waiting
                .lock()
                .entry(spec.current_page)
                .or_default()
                .push(tx);
            rx.await
                .map_err(|_| QueueError::FetchFailed("gate dropped".to_string()))?;
        }
        Ok(self.page(spec))
    }

    async fn fetch_by_ids(&self, ids: &[ItemId]) -> Result<Page, QueueError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let items: Vec<ItemRef> = ids
            .iter()
            .map(|id| ItemRef::new(id.clone(), None, format!("/media/{}.mp4", id)))
            .collect();
        let total = items.len() as u64;
        Ok(Page::new(items, total))
    }
}

/// Remote source that fails every fetch.
pub struct FailingSource;

#[async_trait]
impl CollectionSource for FailingSource {
    async fn fetch_page(&self, _spec: &OrderedCollectionSpec) -> Result<Page, QueueError> {
        Err(QueueError::FetchFailed("connection refused".to_string()))
    }

    async fn fetch_by_ids(&self, _ids: &[ItemId]) -> Result<Page, QueueError> {
        Err(QueueError::FetchFailed("connection refused".to_string()))
    }
}
