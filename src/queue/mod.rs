//! Play Queue
//!
//! A locally materialized, navigable window over a server-ordered (or explicitly listed)
//! collection. The window grows page by page on request and is replaced wholesale when
//! its governing source changes.

mod manager;
mod state;

pub use manager::{QueueOptions, QueueWindowManager, RequestToken};
pub use state::{QueuePhase, QueueSource, QueueState};
