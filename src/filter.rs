//! Ordered Collection Spec
//!
//! Immutable descriptor of a sorted, filtered, paginated view over the remote collection.
//! Paging forward or backward never mutates a spec in place; callers derive a copy with
//! [`OrderedCollectionSpec::with_page`].

use crate::error::QueueError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl std::str::FromStr for SortDirection {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(QueueError::InvalidSpec(format!(
                "unknown sort direction '{}' (must be 'asc' or 'desc')",
                other
            ))),
        }
    }
}

/// Filter predicate applied by the remote collection.
///
/// The queue never evaluates it; it only carries it along to every page request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    /// Free-text search term
    #[serde(default)]
    pub query: Option<String>,

    /// Field criteria, e.g. `organized = "true"`
    #[serde(default)]
    pub criteria: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderedCollectionSpec {
    pub sort_key: String,
    #[serde(default)]
    pub sort_direction: SortDirection,
    pub page_size: u32,
    /// 1-based
    pub current_page: u32,
    #[serde(default)]
    pub predicate: Predicate,
}

impl OrderedCollectionSpec {
    pub fn new(sort_key: impl Into<String>, page_size: u32) -> Self {
        Self {
            sort_key: sort_key.into(),
            sort_direction: SortDirection::Asc,
            page_size,
            current_page: 1,
            predicate: Predicate::default(),
        }
    }

    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.sort_direction = direction;
        self
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = predicate;
        self
    }

    /// Copy of this spec pointing at another page.
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            current_page: page,
            ..self.clone()
        }
    }

    /// 1-based collection position of the first item on the current page.
    pub fn window_start(&self) -> u64 {
        u64::from(self.current_page.saturating_sub(1)) * u64::from(self.page_size) + 1
    }

    /// Page holding the given 1-based collection position.
    pub fn page_for_position(&self, position: u64) -> u32 {
        let page_size = u64::from(self.page_size.max(1));
        let page = position.div_ceil(page_size).max(1);
        u32::try_from(page).unwrap_or(u32::MAX)
    }

    /// Number of pages needed to cover `total_count` items.
    pub fn page_count(&self, total_count: u64) -> u64 {
        total_count.div_ceil(u64::from(self.page_size.max(1)))
    }

    pub fn validate(&self) -> Result<(), QueueError> {
        if self.page_size == 0 {
            return Err(QueueError::InvalidSpec(
                "page size must be at least 1".to_string(),
            ));
        }
        if self.current_page == 0 {
            return Err(QueueError::InvalidSpec(
                "current page is 1-based and must be at least 1".to_string(),
            ));
        }
        if self.sort_key.trim().is_empty() {
            return Err(QueueError::InvalidSpec("sort key cannot be empty".to_string()));
        }
        Ok(())
    }
}
