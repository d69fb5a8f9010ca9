//! Remote Collection Abstraction
//!
//! The queue only ever reads from the server-held collection through this trait. Both
//! operations must be idempotent and side-effect free; the transport behind them (GraphQL,
//! HTTP, a local file) is the implementor's concern.

use crate::error::QueueError;
use crate::filter::OrderedCollectionSpec;
use crate::types::{ItemId, Page};
use async_trait::async_trait;

#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// Fetch the page named by `spec.current_page` / `spec.page_size`.
    async fn fetch_page(&self, spec: &OrderedCollectionSpec) -> Result<Page, QueueError>;

    /// Fetch exactly the given items, in the order requested.
    ///
    /// Unknown ids are dropped; `total_count` is the number of items returned.
    async fn fetch_by_ids(&self, ids: &[ItemId]) -> Result<Page, QueueError>;
}
