//! Materialized window state and the source that governs it.

use crate::filter::OrderedCollectionSpec;
use crate::types::{ItemId, ItemRef, Page};
use serde::{Deserialize, Serialize};

/// What a queue is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueSource {
    /// Sorted, filtered, paginated query
    Query(OrderedCollectionSpec),
    /// Explicit id list, played in the given order
    Ids(Vec<ItemId>),
}

impl QueueSource {
    pub fn spec(&self) -> Option<&OrderedCollectionSpec> {
        match self {
            QueueSource::Query(spec) => Some(spec),
            QueueSource::Ids(_) => None,
        }
    }

    /// Same source, re-pointed at `page` when one is given and the source is paged.
    pub fn for_page(&self, page: Option<u32>) -> QueueSource {
        match (self, page) {
            (QueueSource::Query(spec), Some(page)) => QueueSource::Query(spec.with_page(page)),
            _ => self.clone(),
        }
    }
}

/// Lifecycle of a window. There is no error phase: failures leave the window empty or
/// unchanged and the phase moves on to `Ready`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueuePhase {
    #[default]
    Uninitialized,
    Loading,
    Ready,
}

/// Contiguous slice `[window_start, window_start + items.len() - 1]` of the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueState {
    pub total_count: u64,
    /// 1-based collection position of `items[0]`
    pub window_start: u64,
    pub items: Vec<ItemRef>,
}

impl Default for QueueState {
    fn default() -> Self {
        Self {
            total_count: 0,
            window_start: 1,
            items: Vec::new(),
        }
    }
}

impl QueueState {
    pub fn from_page(page: Page, window_start: u64) -> Self {
        Self {
            total_count: page.total_count,
            window_start: window_start.max(1),
            items: page.items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of the last materialized item (`window_start - 1` when empty).
    pub fn window_end(&self) -> u64 {
        (self.window_start + self.items.len() as u64).saturating_sub(1)
    }

    pub fn has_more(&self) -> bool {
        self.window_end() < self.total_count
    }

    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// 1-based collection position of an item in the window.
    pub fn position_of(&self, id: &ItemId) -> Option<u64> {
        self.index_of(id).map(|index| self.window_start + index as u64)
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    pub(crate) fn prepend(&mut self, items: Vec<ItemRef>, new_start: u64) {
        let mut combined = items;
        combined.append(&mut self.items);
        self.items = combined;
        self.window_start = new_start.max(1);
    }

    pub(crate) fn append(&mut self, mut items: Vec<ItemRef>) {
        self.items.append(&mut items);
    }
}
