//! Navigation Bridge
//!
//! The window manager never changes routes itself. It hands a navigation decision to a
//! [`Navigator`] and moves on; the host turns that decision into a [`SceneRoute`] and
//! re-creates the manager for the new current item.

use crate::queue::QueueSource;
use crate::types::ItemId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use tracing::{debug, info};
use url::form_urlencoded;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigateOptions {
    /// Page the target item lives on, when the queue is paged and it is known
    pub page: Option<u32>,
    pub autoplay: bool,
}

impl NavigateOptions {
    pub fn autoplay() -> Self {
        Self {
            page: None,
            autoplay: true,
        }
    }

    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

/// Navigation sink. Requests a route change and returns without awaiting it.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, item_id: &ItemId, options: NavigateOptions);
}

/// Route to a single scene, carrying the queue it was reached from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRoute {
    pub item_id: ItemId,
    pub queue: Option<QueueSource>,
    #[serde(default)]
    pub autoplay: bool,
    /// Initial playback position in seconds
    #[serde(default)]
    pub timestamp: u64,
}

impl SceneRoute {
    pub fn new(item_id: ItemId) -> Self {
        Self {
            item_id,
            queue: None,
            autoplay: false,
            timestamp: 0,
        }
    }

    pub fn with_queue(mut self, queue: QueueSource) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Apply the parameters parsed from a location query string.
    pub fn with_params(mut self, params: RouteParams) -> Self {
        self.autoplay = params.autoplay;
        self.timestamp = params.timestamp;
        self
    }

    /// Location path with the route parameters it carries.
    pub fn location(&self) -> String {
        let mut params = Vec::new();
        if self.autoplay {
            params.push("autoplay=true".to_string());
        }
        if self.timestamp > 0 {
            params.push(format!("t={}", self.timestamp));
        }
        if params.is_empty() {
            format!("/scenes/{}", self.item_id)
        } else {
            format!("/scenes/{}?{}", self.item_id, params.join("&"))
        }
    }
}

impl fmt::Display for SceneRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location())?;
        if let Some(QueueSource::Query(spec)) = &self.queue {
            write!(f, " (page {})", spec.current_page)?;
        }
        Ok(())
    }
}

/// UI state derived from a location query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteParams {
    pub autoplay: bool,
    pub timestamp: u64,
}

impl RouteParams {
    /// Parse `autoplay` and `t` from a query string such as `?autoplay=true&t=42`.
    ///
    /// `autoplay` is only set by a single `autoplay=true`. `t` takes its first value and
    /// reads leading digits; anything else yields 0.
    /// Keys and values are percent-decoded (`+` is a space) before the rules apply.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut autoplay_values = Vec::new();
        let mut timestamp = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "autoplay" => autoplay_values.push(value),
                "t" if timestamp.is_none() => timestamp = Some(parse_leading_digits(&value)),
                _ => {}
            }
        }

        Self {
            autoplay: autoplay_values.len() == 1 && autoplay_values[0] == "true",
            timestamp: timestamp.unwrap_or(0),
        }
    }
}

fn parse_leading_digits(value: &str) -> u64 {
    let digits: String = value
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

/// Navigator that turns decisions into [`SceneRoute`]s on a channel.
///
/// Paged queues keep their descriptor; when a page is supplied the descriptor is
/// re-pointed at it so the next manager materializes the page holding the target.
pub struct RouteBridge {
    source: Option<QueueSource>,
    routes: mpsc::UnboundedSender<SceneRoute>,
}

impl RouteBridge {
    pub fn new(source: Option<QueueSource>) -> (Self, mpsc::UnboundedReceiver<SceneRoute>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { source, routes: tx }, rx)
    }

    pub fn with_sender(source: Option<QueueSource>, routes: mpsc::UnboundedSender<SceneRoute>) -> Self {
        Self { source, routes }
    }

    pub fn route_for(&self, item_id: &ItemId, options: NavigateOptions) -> SceneRoute {
        SceneRoute {
            item_id: item_id.clone(),
            queue: self
                .source
                .as_ref()
                .map(|source| source.for_page(options.page)),
            autoplay: options.autoplay,
            timestamp: 0,
        }
    }
}

impl Navigator for RouteBridge {
    fn navigate_to(&self, item_id: &ItemId, options: NavigateOptions) {
        let route = self.route_for(item_id, options);
        info!(location = %route.location(), "Navigating to scene");
        if self.routes.send(route).is_err() {
            debug!(item_id = %item_id, "Route receiver dropped, navigation ignored");
        }
    }
}

/// Navigator that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    requests: Mutex<Vec<(ItemId, NavigateOptions)>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<(ItemId, NavigateOptions)> {
        self.requests.lock().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, item_id: &ItemId, options: NavigateOptions) {
        self.requests.lock().push((item_id.clone(), options));
    }
}
