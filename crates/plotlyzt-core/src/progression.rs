//! Scroll-bound horizontal progression
//!
//! A pinned container holds still while the page scrolls through its pin
//! range; progress through that range slides a track of panels sideways.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::FlowConfig;
use crate::task::TaskScope;
use crate::viewport::Viewport;
use crate::visibility::Measure;

/// Continuous progress mapped onto a row of equal-width panels
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollProgression {
    progress: f64,
    panel_count: usize,
    panel_width_px: u32,
    travel_distance_px: u32,
    current_panel_index: usize,
}

impl ScrollProgression {
    pub fn new(panel_count: usize, panel_width_px: u32) -> Self {
        Self {
            progress: 0.0,
            panel_count,
            panel_width_px,
            travel_distance_px: travel_distance(panel_count, panel_width_px),
            current_panel_index: 0,
        }
    }

    /// Set progress (clamped to `[0, 1]`). Returns the new panel index only
    /// when it differs from the previous one.
    pub fn set_progress(&mut self, progress: f64) -> Option<usize> {
        self.progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        let index = panel_index_for(self.progress, self.panel_count);
        if index == self.current_panel_index {
            return None;
        }
        self.current_panel_index = index;
        Some(index)
    }

    /// New panel width; progress is kept so the track lands at the same
    /// relative position
    pub fn resize(&mut self, panel_width_px: u32) {
        self.panel_width_px = panel_width_px;
        self.travel_distance_px = travel_distance(self.panel_count, panel_width_px);
    }

    /// Horizontal offset of the track
    pub fn translation_px(&self) -> f64 {
        -(self.travel_distance_px as f64) * self.progress
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn panel_count(&self) -> usize {
        self.panel_count
    }

    pub fn panel_width_px(&self) -> u32 {
        self.panel_width_px
    }

    pub fn travel_distance_px(&self) -> u32 {
        self.travel_distance_px
    }

    pub fn current_panel_index(&self) -> usize {
        self.current_panel_index
    }
}

fn travel_distance(panel_count: usize, panel_width_px: u32) -> u32 {
    panel_width_px.saturating_mul(panel_count.saturating_sub(1) as u32)
}

/// `round(progress * (count - 1))`, clamped to the last panel
pub fn panel_index_for(progress: f64, panel_count: usize) -> usize {
    let last = panel_count.saturating_sub(1);
    let index = (progress.clamp(0.0, 1.0) * last as f64).round() as usize;
    index.min(last)
}

/// Document range over which a container stays pinned
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PinRange {
    pub start_px: f64,
    pub length_px: f64,
}

impl PinRange {
    /// Linear progress through the range at scroll offset `scroll_y`
    pub fn progress_at(&self, scroll_y: f64) -> f64 {
        if self.length_px <= 0.0 {
            return if scroll_y >= self.start_px { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.start_px) / self.length_px).clamp(0.0, 1.0)
    }

    pub fn contains(&self, scroll_y: f64) -> bool {
        scroll_y >= self.start_px && scroll_y <= self.start_px + self.length_px
    }
}

/// How wide each panel is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelSizing {
    ViewportWidth,
    Fixed(u32),
}

impl PanelSizing {
    fn width(self, viewport: Viewport) -> u32 {
        match self {
            Self::ViewportWidth => viewport.width,
            Self::Fixed(px) => px,
        }
    }
}

/// The element being slid sideways
pub trait Track: Send + Sync {
    fn translate_x(&self, px: f64);
}

impl Track for watch::Sender<f64> {
    fn translate_x(&self, px: f64) {
        self.send_replace(px);
    }
}

struct Signals {
    ready: watch::Sender<bool>,
    progress: watch::Sender<f64>,
    panel_index: watch::Sender<usize>,
    pinned: watch::Sender<bool>,
    translation: watch::Sender<f64>,
    travel: watch::Sender<u32>,
}

impl Signals {
    fn new() -> Self {
        Self {
            ready: watch::Sender::new(false),
            progress: watch::Sender::new(0.0),
            panel_index: watch::Sender::new(0),
            pinned: watch::Sender::new(false),
            translation: watch::Sender::new(0.0),
            travel: watch::Sender::new(0),
        }
    }
}

fn send_if_changed<T: PartialEq>(tx: &watch::Sender<T>, value: T) -> bool {
    tx.send_if_modified(|current| {
        if *current == value {
            return false;
        }
        *current = value;
        true
    })
}

/// Measured geometry of the pinned container
#[derive(Debug, Clone, Copy)]
struct Geometry {
    pin: PinRange,
    panel_width_px: u32,
}

struct Binding {
    container: Arc<dyn Measure>,
    track: Arc<dyn Track>,
    sizing: PanelSizing,
    pin_viewports: f64,
    settle_delay: Duration,
    resize_debounce: Duration,
    scroll_rx: watch::Receiver<f64>,
    viewport_rx: watch::Receiver<Viewport>,
    state: ScrollProgression,
    signals: Arc<Signals>,
}

impl Binding {
    fn measure(&self) -> Option<Geometry> {
        let rect = self.container.rect()?;
        let viewport = *self.viewport_rx.borrow();
        Some(Geometry {
            pin: PinRange {
                start_px: rect.top,
                length_px: viewport.height as f64 * self.pin_viewports,
            },
            panel_width_px: self.sizing.width(viewport),
        })
    }

    fn apply_scroll(&mut self, geometry: &Geometry) {
        let scroll_y = *self.scroll_rx.borrow_and_update();
        let progress = geometry.pin.progress_at(scroll_y);

        if let Some(index) = self.state.set_progress(progress) {
            debug!(index, progress, "Flow panel changed");
            self.signals.panel_index.send_replace(index);
        }
        send_if_changed(&self.signals.pinned, geometry.pin.contains(scroll_y));
        send_if_changed(&self.signals.progress, self.state.progress());
        self.translate();
    }

    fn translate(&self) {
        let px = self.state.translation_px();
        self.track.translate_x(px);
        send_if_changed(&self.signals.translation, px);
    }

    async fn run(mut self) {
        // Layout before this point may not be final
        tokio::time::sleep(self.settle_delay).await;

        let Some(mut geometry) = self.measure() else {
            warn!("Flow container has no layout, showing static panels");
            return;
        };
        self.state.resize(geometry.panel_width_px);
        self.signals.travel.send_replace(self.state.travel_distance_px());
        self.signals.ready.send_replace(true);
        info!(
            panels = self.state.panel_count(),
            travel_px = self.state.travel_distance_px(),
            pin_px = geometry.pin.length_px,
            "Flow progression bound"
        );
        self.viewport_rx.mark_unchanged();
        self.apply_scroll(&geometry);

        let mut resize_deadline: Option<Instant> = None;
        loop {
            tokio::select! {
                changed = self.scroll_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.apply_scroll(&geometry);
                }
                changed = self.viewport_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.viewport_rx.mark_unchanged();
                    resize_deadline = Some(Instant::now() + self.resize_debounce);
                }
                _ = tokio::time::sleep_until(resize_deadline.unwrap_or_else(Instant::now)),
                    if resize_deadline.is_some() =>
                {
                    resize_deadline = None;
                    match self.measure() {
                        Some(remeasured) => {
                            geometry = remeasured;
                            self.state.resize(geometry.panel_width_px);
                            self.signals.travel.send_replace(self.state.travel_distance_px());
                            debug!(
                                travel_px = self.state.travel_distance_px(),
                                "Flow travel recomputed"
                            );
                            // The pin range moved under a scroll offset that didn't
                            self.apply_scroll(&geometry);
                        }
                        None => warn!("Flow container lost its layout on resize"),
                    }
                }
            }
        }
    }
}

/// A live binding of scroll position to a sliding panel track
pub struct ScrollBoundProgression {
    panel_count: usize,
    signals: Arc<Signals>,
    scope: TaskScope,
}

impl ScrollBoundProgression {
    /// Bind `track` to scroll progress through `container`'s pin range.
    ///
    /// Measurement waits for the configured settle delay. Resize events are
    /// debounced before the travel distance is recomputed.
    pub fn bind(
        container: Arc<dyn Measure>,
        track: Arc<dyn Track>,
        panel_count: usize,
        sizing: PanelSizing,
        scroll_rx: watch::Receiver<f64>,
        viewport_rx: watch::Receiver<Viewport>,
        config: &FlowConfig,
    ) -> Self {
        let signals = Arc::new(Signals::new());
        let binding = Binding {
            container,
            track,
            sizing,
            pin_viewports: config.pin_viewports,
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            resize_debounce: Duration::from_millis(config.resize_debounce_ms),
            scroll_rx,
            viewport_rx,
            state: ScrollProgression::new(panel_count, 0),
            signals: Arc::clone(&signals),
        };

        let mut scope = TaskScope::new("flow-progression");
        scope.spawn(binding.run());

        Self {
            panel_count,
            signals,
            scope,
        }
    }

    pub fn panel_count(&self) -> usize {
        self.panel_count
    }

    /// Whether the container has been measured
    pub fn is_ready(&self) -> bool {
        *self.signals.ready.borrow()
    }

    pub fn progress(&self) -> watch::Receiver<f64> {
        self.signals.progress.subscribe()
    }

    /// Emits only when the rounded panel index changes
    pub fn panel_index(&self) -> watch::Receiver<usize> {
        self.signals.panel_index.subscribe()
    }

    pub fn pinned(&self) -> watch::Receiver<bool> {
        self.signals.pinned.subscribe()
    }

    pub fn translation(&self) -> watch::Receiver<f64> {
        self.signals.translation.subscribe()
    }

    pub fn travel_distance_px(&self) -> u32 {
        *self.signals.travel.borrow()
    }

    pub fn current_panel_index(&self) -> usize {
        *self.signals.panel_index.borrow()
    }

    /// Release the scroll and resize subscriptions. Returns `false` if
    /// already torn down.
    pub fn teardown(&mut self) -> bool {
        self.scope.teardown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::ElementRect;
    use crate::visibility::ViewportTracker;

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[test]
    fn test_four_panels_travel_and_index() {
        let mut p = ScrollProgression::new(4, 800);
        assert_eq!(p.travel_distance_px(), 2400);

        assert_eq!(p.set_progress(0.5), Some(2));
        assert_eq!(p.translation_px(), -1200.0);

        assert_eq!(p.set_progress(1.0), Some(3));
        assert_eq!(p.translation_px(), -2400.0);

        assert_eq!(p.set_progress(7.0), None);
        assert_eq!(p.current_panel_index(), 3);
    }

    #[test]
    fn test_single_panel_never_moves() {
        let mut p = ScrollProgression::new(1, 800);
        assert_eq!(p.travel_distance_px(), 0);
        for progress in [0.0, 0.3, 0.5, 1.0] {
            assert_eq!(p.set_progress(progress), None);
            assert_eq!(p.translation_px(), 0.0);
            assert_eq!(p.current_panel_index(), 0);
        }
    }

    #[test]
    fn test_index_reported_only_on_change() {
        let mut p = ScrollProgression::new(4, 800);
        assert_eq!(p.set_progress(0.1), None);
        assert_eq!(p.set_progress(0.2), Some(1));
        assert_eq!(p.set_progress(0.25), None);
        assert_eq!(p.set_progress(0.0), Some(0));
    }

    #[test]
    fn test_resize_keeps_progress() {
        let mut p = ScrollProgression::new(4, 800);
        p.set_progress(0.5);
        p.resize(400);
        assert_eq!(p.travel_distance_px(), 1200);
        assert_eq!(p.progress(), 0.5);
        assert_eq!(p.translation_px(), -600.0);
    }

    #[test]
    fn test_pin_range_progress() {
        let pin = PinRange { start_px: 600.0, length_px: 600.0 };
        assert_eq!(pin.progress_at(0.0), 0.0);
        assert_eq!(pin.progress_at(900.0), 0.5);
        assert_eq!(pin.progress_at(5000.0), 1.0);
        assert!(pin.contains(600.0));
        assert!(!pin.contains(1201.0));
    }

    fn page() -> Arc<ViewportTracker> {
        let tracker = Arc::new(ViewportTracker::new(Viewport::new(800, 600)));
        tracker.set_layout([
            ("home", ElementRect::new(0.0, 600.0)),
            ("flow", ElementRect::new(600.0, 1200.0)),
            ("contact", ElementRect::new(1800.0, 600.0)),
        ]);
        tracker
    }

    fn bind(tracker: &Arc<ViewportTracker>, track: Arc<watch::Sender<f64>>) -> ScrollBoundProgression {
        ScrollBoundProgression::bind(
            Arc::new(tracker.element("flow")),
            track,
            4,
            PanelSizing::ViewportWidth,
            tracker.subscribe_scroll(),
            tracker.subscribe_viewport(),
            &FlowConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_binding_waits_for_settle_delay() {
        let tracker = page();
        let track = Arc::new(watch::Sender::new(0.0));
        let flow = bind(&tracker, track.clone());

        tracker.set_scroll(900.0);
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!flow.is_ready());
        assert_eq!(*flow.progress().borrow(), 0.0);

        tokio::time::sleep(Duration::from_millis(101)).await;
        assert!(flow.is_ready());
        assert_eq!(flow.travel_distance_px(), 2400);
        assert_eq!(*flow.progress().borrow(), 0.5);
        assert_eq!(flow.current_panel_index(), 2);
        assert_eq!(*track.borrow(), -1200.0);
        assert!(*flow.pinned().borrow());
    }

    #[tokio::test(start_paused = true)]
    async fn test_panel_index_emits_on_rounded_change_only() {
        let tracker = page();
        let flow = bind(&tracker, Arc::new(watch::Sender::new(0.0)));
        tokio::time::sleep(Duration::from_millis(501)).await;

        let mut index_rx = flow.panel_index();
        index_rx.mark_unchanged();
        let mut progress_rx = flow.progress();
        progress_rx.mark_unchanged();

        tracker.set_scroll(610.0);
        settle().await;
        assert!(progress_rx.has_changed().unwrap());
        assert!(!index_rx.has_changed().unwrap());

        tracker.set_scroll(1200.0);
        settle().await;
        assert!(index_rx.has_changed().unwrap());
        assert_eq!(*index_rx.borrow_and_update(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_is_debounced_and_keeps_position() {
        let tracker = page();
        let track = Arc::new(watch::Sender::new(0.0));
        let flow = bind(&tracker, track.clone());
        tracker.set_scroll(900.0);
        tokio::time::sleep(Duration::from_millis(501)).await;
        assert_eq!(*track.borrow(), -1200.0);

        tracker.set_viewport(Viewport::new(400, 600));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(flow.travel_distance_px(), 2400);

        // A second resize inside the window restarts the debounce
        tracker.set_viewport(Viewport::new(500, 600));
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(flow.travel_distance_px(), 2400);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(flow.travel_distance_px(), 1500);
        assert_eq!(*track.borrow(), -750.0);
        assert_eq!(flow.current_panel_index(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shorter_viewport_unpins_without_scrolling() {
        let tracker = page();
        let flow = bind(&tracker, Arc::new(watch::Sender::new(0.0)));
        tracker.set_scroll(1100.0);
        tokio::time::sleep(Duration::from_millis(501)).await;
        assert!(*flow.pinned().borrow());
        assert!(*flow.progress().borrow() < 1.0);

        // Pin range shrinks to 600..1000, leaving the offset past its end
        tracker.set_viewport(Viewport::new(800, 400));
        tokio::time::sleep(Duration::from_millis(201)).await;
        assert_eq!(tracker.scroll_y(), 1100.0);
        assert!(!*flow.pinned().borrow());
        assert_eq!(*flow.progress().borrow(), 1.0);
        assert_eq!(flow.current_panel_index(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_container_degrades_to_static() {
        let tracker = Arc::new(ViewportTracker::new(Viewport::new(800, 600)));
        let track = Arc::new(watch::Sender::new(0.0));
        let flow = bind(&tracker, track.clone());
        tokio::time::sleep(Duration::from_millis(600)).await;
        tracker.set_scroll(900.0);
        settle().await;

        assert!(!flow.is_ready());
        assert_eq!(flow.current_panel_index(), 0);
        assert_eq!(*track.borrow(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_stops_following_scroll() {
        let tracker = page();
        let mut flow = bind(&tracker, Arc::new(watch::Sender::new(0.0)));
        tokio::time::sleep(Duration::from_millis(501)).await;

        assert!(flow.teardown());
        assert!(!flow.teardown());
        tracker.set_scroll(1200.0);
        settle().await;
        assert_eq!(flow.current_panel_index(), 0);
    }
}
