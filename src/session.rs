//! Scene Session
//!
//! The non-rendering half of the scene view. A session owns the current route and one
//! [`QueueWindowManager`] per route: every route change closes the old manager (its
//! in-flight reads resolve into nothing) and materializes a fresh window for the new
//! current item.

use crate::navigation::{RouteBridge, SceneRoute};
use crate::queue::{QueueOptions, QueueState, QueueWindowManager};
use crate::remote::CollectionSource;
use crate::types::ItemId;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub struct SceneSession {
    remote: Arc<dyn CollectionSource>,
    options: QueueOptions,
    seed: Option<u64>,
    routes_tx: mpsc::UnboundedSender<SceneRoute>,
    routes_rx: mpsc::UnboundedReceiver<SceneRoute>,
    route: Option<SceneRoute>,
    queue: Option<Arc<QueueWindowManager>>,
}

impl SceneSession {
    pub fn new(remote: Arc<dyn CollectionSource>, options: QueueOptions) -> Self {
        let (routes_tx, routes_rx) = mpsc::unbounded_channel();
        Self {
            remote,
            options,
            seed: None,
            routes_tx,
            routes_rx,
            route: None,
            queue: None,
        }
    }

    /// Seed random navigation of every manager this session creates.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn route(&self) -> Option<&SceneRoute> {
        self.route.as_ref()
    }

    pub fn current_item(&self) -> Option<&ItemId> {
        self.route.as_ref().map(|route| &route.item_id)
    }

    pub fn queue(&self) -> Option<Arc<QueueWindowManager>> {
        self.queue.clone()
    }

    pub fn queue_state(&self) -> QueueState {
        self.queue
            .as_ref()
            .map(|queue| queue.state())
            .unwrap_or_default()
    }

    /// The queue panel is only offered when the queue has items.
    pub fn queue_visible(&self) -> bool {
        !self.queue_state().is_empty()
    }

    /// Enter a route: drop the previous window and materialize the route's queue.
    pub async fn open(&mut self, route: SceneRoute) {
        if let Some(previous) = self.queue.take() {
            previous.close();
        }
        info!(location = %route.location(), "Opening scene");

        let bridge = RouteBridge::with_sender(route.queue.clone(), self.routes_tx.clone());
        let mut manager = QueueWindowManager::new(self.remote.clone(), Arc::new(bridge))
            .with_options(self.options.clone());
        if let Some(seed) = self.seed {
            manager = manager.with_seed(seed);
        }
        let manager = Arc::new(manager);
        self.queue = Some(manager.clone());
        self.route = Some(route.clone());

        if route.queue.is_some() {
            manager.set_source(route.queue);
            manager.initialize().await;
        }
    }

    pub fn next(&self) -> Option<ItemId> {
        let current = self.current_item()?;
        self.queue.as_ref()?.navigate_next(current)
    }

    pub fn previous(&self) -> Option<ItemId> {
        let current = self.current_item()?;
        self.queue.as_ref()?.navigate_previous(current)
    }

    pub async fn random(&self) -> Option<ItemId> {
        self.queue.as_ref()?.navigate_random().await
    }

    pub async fn load_more(&self) {
        if let Some(queue) = &self.queue {
            queue.extend_forward().await;
        }
    }

    pub async fn load_less(&self) {
        if let Some(queue) = &self.queue {
            queue.extend_backward().await;
        }
    }

    /// Playback of the current item finished: continue with the next one when the route
    /// asked for autoplay.
    pub fn on_playback_complete(&self) -> Option<ItemId> {
        let route = self.route.as_ref()?;
        if !route.autoplay {
            debug!(item_id = %route.item_id, "Playback complete, autoplay off");
            return None;
        }
        self.next()
    }

    /// Route requested by the last navigation, if any.
    pub fn pending_route(&mut self) -> Option<SceneRoute> {
        let mut latest = None;
        while let Ok(route) = self.routes_rx.try_recv() {
            latest = Some(route);
        }
        latest
    }

    /// Open the most recently requested route. Returns false when nothing was requested.
    pub async fn follow_pending(&mut self) -> bool {
        match self.pending_route() {
            Some(route) => {
                self.open(route).await;
                true
            }
            None => false,
        }
    }

    /// Leave the view. Any in-flight read is ignored when it resolves.
    pub fn close(&mut self) {
        if let Some(queue) = self.queue.take() {
            queue.close();
        }
        self.route = None;
    }
}
