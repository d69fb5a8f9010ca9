//! Core value types shared across the queue, the catalog and navigation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque item identifier, as handed out by the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Reference to one item of the remote collection, cached for the lifetime of a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: ItemId,
    #[serde(default)]
    pub title: Option<String>,
    pub path: String,
}

impl ItemRef {
    pub fn new(id: impl Into<ItemId>, title: Option<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title,
            path: path.into(),
        }
    }

    /// Title if set, otherwise the file name of the path.
    pub fn display_name(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => self
                .path
                .rsplit(['/', '\\'])
                .next()
                .unwrap_or(self.path.as_str()),
        }
    }
}

/// One response from a remote fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<ItemRef>,
    /// Total size of the collection the page was cut from
    pub total_count: u64,
}

impl Page {
    pub fn new(items: Vec<ItemRef>, total_count: u64) -> Self {
        Self { items, total_count }
    }
}
