//! The page's smooth-scroll handle
//!
//! [`SmoothScrollController`] is owned by the page shell, which is the only
//! code that creates or destroys the handle. Everything else gets a
//! [`ScrollContext`] and may ask it to scroll; before the handle exists
//! those requests are ignored.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info};

use super::animation::ScrollAnimator;
use crate::config::{EasingType, ScrollConfig};
use crate::error::Ignored;
use crate::task::lock;
use crate::visibility::{AnchorResolver, ViewportTracker};

/// The scrollable document the controller drives
pub trait ScrollSurface: AnchorResolver {
    fn scroll_y(&self) -> f64;
    fn set_scroll(&self, y: f64);
}

impl ScrollSurface for ViewportTracker {
    fn scroll_y(&self) -> f64 {
        ViewportTracker::scroll_y(self)
    }

    fn set_scroll(&self, y: f64) {
        ViewportTracker::set_scroll(self, y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmoothScrollOptions {
    pub wrapper_id: String,
    pub content_id: String,
    /// Catch-up time for every scroll movement
    pub duration: Duration,
    pub easing: EasingType,
    /// Speed/lag effects on tagged elements
    pub effects: bool,
    /// Route native wheel/key scrolling through the smoother
    pub normalize: bool,
}

impl SmoothScrollOptions {
    /// Options for the given wrapper/content pair; touch viewports use the
    /// shorter catch-up duration
    pub fn from_config(
        config: &ScrollConfig,
        wrapper_id: impl Into<String>,
        content_id: impl Into<String>,
        touch: bool,
    ) -> Self {
        let duration_ms = match (config.smooth_enabled, touch) {
            (false, _) => 0,
            (true, true) => config.touch_duration_ms,
            (true, false) => config.animation_duration_ms,
        };
        Self {
            wrapper_id: wrapper_id.into(),
            content_id: content_id.into(),
            duration: Duration::from_millis(duration_ms),
            easing: config.easing,
            effects: config.effects,
            normalize: config.normalize_scroll,
        }
    }
}

/// Identity of one created handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId(u64);

impl std::fmt::Display for HandleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct SmoothScrollHandle {
    id: HandleId,
    options: SmoothScrollOptions,
    animator: ScrollAnimator,
}

#[derive(Default)]
struct ScrollSlot {
    handle: Option<SmoothScrollHandle>,
    next_id: u64,
    live: usize,
}

/// Outcome of a scroll request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollOutcome {
    Started { target: f64 },
    Ignored(Ignored),
}

/// Owner of the page's single smooth-scroll handle
pub struct SmoothScrollController {
    slot: Arc<Mutex<ScrollSlot>>,
    surface: Arc<dyn ScrollSurface>,
    active_tx: watch::Sender<Option<HandleId>>,
}

impl SmoothScrollController {
    pub fn new(surface: Arc<dyn ScrollSurface>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(ScrollSlot::default())),
            surface,
            active_tx: watch::Sender::new(None),
        }
    }

    /// Create the handle, destroying any previous one first
    pub fn create(&self, options: SmoothScrollOptions) -> HandleId {
        let mut slot = lock(&self.slot);
        if let Some(old) = slot.handle.take() {
            slot.live -= 1;
            info!(handle = %old.id, "Destroying previous smooth scroller");
        }

        slot.next_id += 1;
        let id = HandleId(slot.next_id);
        info!(
            handle = %id,
            wrapper = %options.wrapper_id,
            content = %options.content_id,
            duration_ms = options.duration.as_millis() as u64,
            "Smooth scroller created"
        );
        let animator = ScrollAnimator::new(options.duration, options.easing, self.surface.scroll_y());
        slot.handle = Some(SmoothScrollHandle {
            id,
            options,
            animator,
        });
        slot.live += 1;
        drop(slot);

        self.active_tx.send_replace(Some(id));
        id
    }

    /// Destroy `id` if it is still the active handle. Returns `false` when it
    /// was already destroyed or replaced.
    pub fn destroy(&self, id: HandleId) -> bool {
        let mut slot = lock(&self.slot);
        if slot.handle.as_ref().map(|h| h.id) != Some(id) {
            return false;
        }
        slot.handle = None;
        slot.live -= 1;
        drop(slot);

        info!(handle = %id, "Smooth scroller destroyed");
        self.active_tx.send_replace(None);
        true
    }

    /// Destroy whatever handle is active
    pub fn destroy_active(&self) -> bool {
        match self.active() {
            Some(id) => self.destroy(id),
            None => false,
        }
    }

    pub fn active(&self) -> Option<HandleId> {
        *self.active_tx.borrow()
    }

    pub fn is_active(&self) -> bool {
        self.active().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<HandleId>> {
        self.active_tx.subscribe()
    }

    /// Number of handles currently alive (at most one)
    pub fn live_handles(&self) -> usize {
        lock(&self.slot).live
    }

    /// Advance the running animation and write the position to the surface.
    /// Returns whether another frame is needed.
    pub fn update(&self, now: Instant) -> bool {
        let mut slot = lock(&self.slot);
        let Some(handle) = slot.handle.as_mut() else {
            return false;
        };
        if !handle.animator.needs_update() {
            return false;
        }
        let position = handle.animator.update(self.surface.max_scroll(), now);
        let more = handle.animator.needs_update();
        drop(slot);

        self.surface.set_scroll(position);
        more
    }

    /// A reader handle for navigation and other scroll clients
    pub fn context(&self) -> ScrollContext {
        ScrollContext {
            slot: Arc::clone(&self.slot),
            surface: Arc::clone(&self.surface),
        }
    }
}

/// Shared access to the current smooth-scroll handle
#[derive(Clone)]
pub struct ScrollContext {
    slot: Arc<Mutex<ScrollSlot>>,
    surface: Arc<dyn ScrollSurface>,
}

impl ScrollContext {
    pub fn is_ready(&self) -> bool {
        lock(&self.slot).handle.is_some()
    }

    /// Animate to a named anchor. Ignored until the handle exists.
    pub fn scroll_to(&self, anchor_id: &str) -> ScrollOutcome {
        let mut slot = lock(&self.slot);
        let Some(handle) = slot.handle.as_mut() else {
            debug!(anchor = anchor_id, "Scroll requested before scroller exists");
            return ScrollOutcome::Ignored(Ignored::PrematureInvocation);
        };
        let Some(top) = self.surface.resolve(anchor_id) else {
            debug!(anchor = anchor_id, "Unknown anchor");
            return ScrollOutcome::Ignored(Ignored::UnknownAnchor);
        };

        let max_scroll = self.surface.max_scroll();
        // The surface may have moved natively since the last frame
        handle.animator.jump_to(self.surface.scroll_y());
        handle.animator.animate_to(top, max_scroll, Instant::now());
        let target = handle.animator.target();
        // Smoothing off or zero-length move: no frame will write the surface
        let settled = !handle.animator.needs_update();
        let position = handle.animator.position();
        drop(slot);

        debug!(anchor = anchor_id, target, "Scrolling to anchor");
        if settled {
            self.surface.set_scroll(position);
        }
        ScrollOutcome::Started { target }
    }

    /// Relative scroll from wheel or keys. Goes through the smoother when a
    /// normalizing handle exists, straight to the surface otherwise.
    pub fn scroll_by(&self, delta: f64) {
        let mut slot = lock(&self.slot);
        if let Some(handle) = slot.handle.as_mut().filter(|h| h.options.normalize) {
            if !handle.animator.is_animating() {
                handle.animator.jump_to(self.surface.scroll_y());
            }
            handle.animator.nudge(delta, self.surface.max_scroll());
            let jumped = !handle.animator.needs_update();
            let position = handle.animator.position();
            drop(slot);
            if jumped {
                self.surface.set_scroll(position);
            }
            return;
        }
        drop(slot);
        self.surface.set_scroll(self.surface.scroll_y() + delta);
    }

    /// Whether speed/lag effects are on for the active handle
    pub fn effects_enabled(&self) -> bool {
        lock(&self.slot)
            .handle
            .as_ref()
            .is_some_and(|h| h.options.effects)
    }
}

/// Vertical offset for an element scrolling at `speed` relative to the page
/// (`1.0` scrolls normally, `0.5` at half speed)
pub fn parallax_offset(scroll_y: f64, speed: f64) -> f64 {
    scroll_y * (1.0 - speed)
}
