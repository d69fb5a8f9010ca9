//! Queue Window Manager
//!
//! Keeps a navigable window over a remote ordered collection without fetching all of
//! it. Every fetching operation performs exactly one remote read and stamps it with a
//! [`RequestToken`]; when the response arrives it is applied only if no newer request has
//! been issued since and the manager has not been closed.

use super::state::{QueuePhase, QueueSource, QueueState};
use crate::filter::OrderedCollectionSpec;
use crate::navigation::{NavigateOptions, Navigator};
use crate::remote::CollectionSource;
use crate::types::{ItemId, Page};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Sequence number of an issued remote read
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct QueueOptions {
    /// Drop responses to requests that were superseded by a newer one.
    /// When false, overlapping responses are applied in arrival order.
    pub discard_stale_responses: bool,
}

impl Default for QueueOptions {
    fn default() -> Self {
        Self {
            discard_stale_responses: true,
        }
    }
}

#[derive(Debug, Default)]
struct QueueInner {
    source: Option<QueueSource>,
    state: QueueState,
    phase: QueuePhase,
}

pub struct QueueWindowManager {
    remote: Arc<dyn CollectionSource>,
    navigator: Arc<dyn Navigator>,
    options: QueueOptions,
    inner: RwLock<QueueInner>,
    latest_request: AtomicU64,
    closed: AtomicBool,
    rng: Mutex<StdRng>,
}

impl QueueWindowManager {
    pub fn new(remote: Arc<dyn CollectionSource>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            remote,
            navigator,
            options: QueueOptions::default(),
            inner: RwLock::new(QueueInner::default()),
            latest_request: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn with_options(mut self, options: QueueOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a fixed seed for random navigation.
    pub fn with_seed(self, seed: u64) -> Self {
        *self.rng.lock() = StdRng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> QueueState {
        self.inner.read().state.clone()
    }

    pub fn phase(&self) -> QueuePhase {
        self.inner.read().phase
    }

    pub fn source(&self) -> Option<QueueSource> {
        self.inner.read().source.clone()
    }

    pub fn has_more(&self) -> bool {
        self.inner.read().state.has_more()
    }

    pub fn index_of(&self, item_id: &ItemId) -> Option<usize> {
        self.inner.read().state.index_of(item_id)
    }

    /// Stop applying responses. In-flight reads resolve into nothing.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!("Queue window closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Replace the governing source. A different source drops the window.
    pub fn set_source(&self, source: Option<QueueSource>) {
        let mut inner = self.inner.write();
        if inner.source != source {
            inner.source = source;
            inner.state = QueueState::default();
            inner.phase = QueuePhase::Uninitialized;
            // Invalidate anything still in flight for the old source.
            self.issue_request();
        }
    }

    pub async fn initialize_from_spec(&self, spec: OrderedCollectionSpec) {
        self.set_source(Some(QueueSource::Query(spec)));
        self.initialize().await;
    }

    pub async fn initialize_from_id_list(&self, ids: Vec<ItemId>) {
        self.set_source(Some(QueueSource::Ids(ids)));
        self.initialize().await;
    }

    /// Materialize the window for the current source, replacing whatever was there.
    pub async fn initialize(&self) {
        if self.is_closed() {
            return;
        }
        let (source, token) = {
            let mut inner = self.inner.write();
            let Some(source) = inner.source.clone() else {
                return;
            };
            inner.phase = QueuePhase::Loading;
            (source, self.issue_request())
        };

        let (result, window_start) = match &source {
            QueueSource::Query(spec) => {
                if let Err(e) = spec.validate() {
                    warn!(error = %e, "Invalid queue spec, leaving queue empty");
                    self.apply(token, |inner| {
                        inner.state = QueueState::default();
                        inner.phase = QueuePhase::Ready;
                    });
                    return;
                }
                debug!(
                    request = token.as_u64(),
                    page = spec.current_page,
                    page_size = spec.page_size,
                    "Fetching queue page"
                );
                (self.remote.fetch_page(spec).await, spec.window_start())
            }
            QueueSource::Ids(ids) => {
                debug!(request = token.as_u64(), count = ids.len(), "Fetching queue by ids");
                (self.remote.fetch_by_ids(ids).await, 1)
            }
        };

        self.apply(token, |inner| {
            inner.state = match result {
                Ok(page) => QueueState::from_page(page, window_start),
                Err(e) => {
                    warn!(error = %e, "Queue fetch failed, leaving queue empty");
                    QueueState::default()
                }
            };
            inner.phase = QueuePhase::Ready;
        });
    }

    /// Prepend the page before the window.
    pub async fn extend_backward(&self) {
        if self.is_closed() {
            return;
        }
        let (spec, new_start, token) = {
            let inner = self.inner.read();
            let Some(spec) = ready_spec(&inner) else {
                return;
            };
            if inner.state.window_start <= 1 {
                return;
            }
            let new_start = inner
                .state
                .window_start
                .saturating_sub(u64::from(spec.page_size))
                .max(1);
            let page = spec.page_for_position(new_start);
            (spec.with_page(page), new_start, self.issue_request())
        };

        debug!(
            request = token.as_u64(),
            page = spec.current_page,
            "Fetching previous queue page"
        );
        let result = self.remote.fetch_page(&spec).await;
        self.apply(token, |inner| match result {
            Ok(page) => inner.state.prepend(page.items, new_start),
            Err(e) => warn!(error = %e, "Failed to load previous queue page"),
        });
    }

    /// Append the page after the window.
    pub async fn extend_forward(&self) {
        if self.is_closed() {
            return;
        }
        let (spec, token) = {
            let inner = self.inner.read();
            let Some(spec) = ready_spec(&inner) else {
                return;
            };
            if !inner.state.has_more() {
                return;
            }
            let new_start = inner.state.window_start + inner.state.len() as u64;
            let page = spec.page_for_position(new_start);
            (spec.with_page(page), self.issue_request())
        };

        debug!(
            request = token.as_u64(),
            page = spec.current_page,
            "Fetching next queue page"
        );
        let result = self.remote.fetch_page(&spec).await;
        self.apply(token, |inner| match result {
            Ok(page) => inner.state.append(page.items),
            Err(e) => warn!(error = %e, "Failed to load next queue page"),
        });
    }

    /// Navigate to the item after `current` if it is already in the window.
    ///
    /// Does not extend the window first: with `current` last, this is a no-op even when
    /// more items exist remotely.
    pub fn navigate_next(&self, current: &ItemId) -> Option<ItemId> {
        self.navigate_neighbor(current, 1)
    }

    pub fn navigate_previous(&self, current: &ItemId) -> Option<ItemId> {
        self.navigate_neighbor(current, -1)
    }

    /// Navigate to a random item of the queue.
    ///
    /// Paged queues pick a page uniformly, then an offset below
    /// `min(page_size, total_count)`, fetch that page and go to the offset if the page is
    /// long enough. Short last pages are therefore hit less often than their share of
    /// pages suggests. Id-list queues pick uniformly among the known items.
    pub async fn navigate_random(&self) -> Option<ItemId> {
        if self.is_closed() {
            return None;
        }
        let (source, total_count, items) = {
            let inner = self.inner.read();
            if inner.phase != QueuePhase::Ready {
                return None;
            }
            (
                inner.source.clone()?,
                inner.state.total_count,
                inner.state.ids(),
            )
        };

        match source {
            QueueSource::Query(spec) => {
                if total_count == 0 {
                    return None;
                }
                let pages = spec.page_count(total_count);
                let (page, index) = {
                    let mut rng = self.rng.lock();
                    let page = rng.random_range(1..=pages);
                    let bound = u64::from(spec.page_size).min(total_count);
                    (page, rng.random_range(0..bound) as usize)
                };
                let page = u32::try_from(page).unwrap_or(u32::MAX);
                let token = self.issue_request();
                debug!(request = token.as_u64(), page, index, "Fetching random queue page");

                let result = self.remote.fetch_page(&spec.with_page(page)).await;
                if !self.accepts(token) {
                    debug!(request = token.as_u64(), "Discarding stale random pick");
                    return None;
                }
                let target = match result {
                    Ok(Page { items, .. }) => items.into_iter().nth(index)?.id,
                    Err(e) => {
                        warn!(error = %e, "Failed to load random queue page");
                        return None;
                    }
                };
                self.go(&target, NavigateOptions::autoplay().on_page(page));
                Some(target)
            }
            QueueSource::Ids(_) => {
                if items.is_empty() {
                    return None;
                }
                let index = self.rng.lock().random_range(0..items.len());
                let target = items[index].clone();
                self.go(&target, NavigateOptions::autoplay());
                Some(target)
            }
        }
    }

    fn navigate_neighbor(&self, current: &ItemId, step: isize) -> Option<ItemId> {
        if self.is_closed() {
            return None;
        }
        let target = {
            let inner = self.inner.read();
            let index = inner.state.index_of(current)?;
            let neighbor = index.checked_add_signed(step)?;
            inner.state.items.get(neighbor)?.id.clone()
        };
        self.go(&target, NavigateOptions::autoplay());
        Some(target)
    }

    fn go(&self, target: &ItemId, options: NavigateOptions) {
        info!(item_id = %target, page = ?options.page, "Queue navigation");
        self.navigator.navigate_to(target, options);
    }

    fn issue_request(&self) -> RequestToken {
        RequestToken(self.latest_request.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn accepts(&self, token: RequestToken) -> bool {
        if self.is_closed() {
            return false;
        }
        !self.options.discard_stale_responses
            || self.latest_request.load(Ordering::SeqCst) == token.as_u64()
    }

    fn apply(&self, token: RequestToken, update: impl FnOnce(&mut QueueInner)) {
        let mut inner = self.inner.write();
        if !self.accepts(token) {
            debug!(request = token.as_u64(), "Discarding stale queue response");
            return;
        }
        update(&mut inner);
    }
}

/// Paged spec of a window that is ready to be extended.
fn ready_spec(inner: &QueueInner) -> Option<OrderedCollectionSpec> {
    if inner.phase != QueuePhase::Ready {
        return None;
    }
    inner.source.as_ref()?.spec().cloned()
}

impl Drop for QueueWindowManager {
    fn drop(&mut self) {
        self.close();
    }
}
