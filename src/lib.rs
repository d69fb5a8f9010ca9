//! Scene Queue: Windowed Play Queue over Remote Collections
//!
//! Materializes a contiguous window of a large, remotely stored, ordered collection of
//! scenes, grows it a page at a time in either direction, and turns next / previous /
//! random decisions into route changes for the hosting view.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod navigation;
pub mod queue;
pub mod remote;
pub mod scene;
pub mod session;
pub mod types;
