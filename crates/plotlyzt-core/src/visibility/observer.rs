//! Intersection observation capability
//!
//! [`IntersectionSource`] is the seam between the engine and whatever owns
//! layout. [`ViewportTracker`] is the in-process implementation: it knows
//! every element's rect, the scroll offset and the viewport, and pushes a
//! fresh intersection ratio to each observer whenever one of those changes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::task::lock;
use crate::viewport::{intersection_ratio, ElementRect, Viewport};
use crate::{Error, Result};

/// Stream of intersection ratios in `[0, 1]` for one observed element
pub type IntersectionStream = mpsc::UnboundedReceiver<f64>;

/// Something that can report how much of an element is on screen
pub trait IntersectionSource: Send + Sync {
    /// Start observing `target`. The viewport is grown by `margin_px` on
    /// both edges when computing the ratio. Fails with
    /// [`Error::ObservationUnavailable`] when observation is not supported.
    fn observe(&self, target: &str, margin_px: i32) -> Result<IntersectionStream>;
}

/// On-demand layout measurement of a single element
pub trait Measure: Send + Sync {
    fn rect(&self) -> Option<ElementRect>;
}

impl Measure for ElementRect {
    fn rect(&self) -> Option<ElementRect> {
        Some(*self)
    }
}

/// Resolves named anchors to scroll offsets
pub trait AnchorResolver: Send + Sync {
    fn resolve(&self, anchor_id: &str) -> Option<f64>;
    fn max_scroll(&self) -> f64;
}

struct Observer {
    target: String,
    margin_px: i32,
    tx: mpsc::UnboundedSender<f64>,
    last_ratio: Option<f64>,
}

#[derive(Default)]
struct TrackerState {
    layout: HashMap<String, ElementRect>,
    content_height: f64,
    observers: Vec<Observer>,
}

/// Layout-aware intersection source shared by the page and its front end
pub struct ViewportTracker {
    available: bool,
    state: Mutex<TrackerState>,
    scroll_tx: watch::Sender<f64>,
    viewport_tx: watch::Sender<Viewport>,
}

impl ViewportTracker {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            available: true,
            state: Mutex::new(TrackerState::default()),
            scroll_tx: watch::Sender::new(0.0),
            viewport_tx: watch::Sender::new(viewport),
        }
    }

    /// A tracker whose observation capability is missing; gates built on it
    /// take the timed fallback path
    pub fn unavailable(viewport: Viewport) -> Self {
        Self {
            available: false,
            ..Self::new(viewport)
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Replace the element layout
    pub fn set_layout<I, S>(&self, rects: I)
    where
        I: IntoIterator<Item = (S, ElementRect)>,
        S: Into<String>,
    {
        {
            let mut state = lock(&self.state);
            state.layout = rects.into_iter().map(|(id, rect)| (id.into(), rect)).collect();
            state.content_height = state
                .layout
                .values()
                .map(ElementRect::bottom)
                .fold(0.0, f64::max);
        }
        // Content may have shrunk under the current offset
        let clamped = self.scroll_y().min(self.max_scroll());
        self.scroll_tx.send_if_modified(|y| {
            let changed = *y != clamped;
            *y = clamped;
            changed
        });
        self.notify();
    }

    /// Move the scroll offset, clamped to the scrollable range
    pub fn set_scroll(&self, y: f64) {
        let y = y.clamp(0.0, self.max_scroll());
        let changed = self.scroll_tx.send_if_modified(|current| {
            if *current == y {
                return false;
            }
            *current = y;
            true
        });
        if changed {
            self.notify();
        }
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        let changed = self.viewport_tx.send_if_modified(|current| {
            if *current == viewport {
                return false;
            }
            *current = viewport;
            true
        });
        if changed {
            self.notify();
        }
    }

    pub fn scroll_y(&self) -> f64 {
        *self.scroll_tx.borrow()
    }

    pub fn viewport(&self) -> Viewport {
        *self.viewport_tx.borrow()
    }

    pub fn subscribe_scroll(&self) -> watch::Receiver<f64> {
        self.scroll_tx.subscribe()
    }

    pub fn subscribe_viewport(&self) -> watch::Receiver<Viewport> {
        self.viewport_tx.subscribe()
    }

    pub fn rect(&self, id: &str) -> Option<ElementRect> {
        lock(&self.state).layout.get(id).copied()
    }

    pub fn content_height(&self) -> f64 {
        lock(&self.state).content_height
    }

    /// A measurable handle to one element
    pub fn element(self: &Arc<Self>, id: impl Into<String>) -> ElementHandle {
        ElementHandle {
            tracker: Arc::clone(self),
            id: id.into(),
        }
    }

    /// Number of live observers
    pub fn observer_count(&self) -> usize {
        lock(&self.state).observers.len()
    }

    fn notify(&self) {
        let scroll_y = self.scroll_y();
        let viewport_height = self.viewport().height as f64;

        let mut state = lock(&self.state);
        let TrackerState { layout, observers, .. } = &mut *state;
        observers.retain_mut(|observer| {
            let Some(rect) = layout.get(&observer.target) else {
                return !observer.tx.is_closed();
            };
            let ratio = intersection_ratio(*rect, scroll_y, viewport_height, observer.margin_px);
            if observer.last_ratio == Some(ratio) {
                return !observer.tx.is_closed();
            }
            observer.last_ratio = Some(ratio);
            observer.tx.send(ratio).is_ok()
        });
    }
}

impl IntersectionSource for ViewportTracker {
    fn observe(&self, target: &str, margin_px: i32) -> Result<IntersectionStream> {
        if !self.available {
            return Err(Error::ObservationUnavailable(format!(
                "cannot observe '{}'",
                target
            )));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.state).observers.push(Observer {
            target: target.to_string(),
            margin_px,
            tx,
            last_ratio: None,
        });
        debug!(element = target, margin_px, "Observing element");

        // Observers receive the current ratio immediately
        self.notify();
        Ok(rx)
    }
}

impl AnchorResolver for ViewportTracker {
    fn resolve(&self, anchor_id: &str) -> Option<f64> {
        self.rect(anchor_id).map(|rect| rect.top)
    }

    fn max_scroll(&self) -> f64 {
        (self.content_height() - self.viewport().height as f64).max(0.0)
    }
}

/// Element measured through a shared tracker
#[derive(Clone)]
pub struct ElementHandle {
    tracker: Arc<ViewportTracker>,
    id: String,
}

impl ElementHandle {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Measure for ElementHandle {
    fn rect(&self) -> Option<ElementRect> {
        self.tracker.rect(&self.id)
    }
}
