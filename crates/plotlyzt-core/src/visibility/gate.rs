use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::{Thresholds, VisibilityConfig};
use crate::task::TaskScope;
use crate::viewport::Viewport;

use super::observer::{IntersectionSource, IntersectionStream};

/// How a gate decides it has become visible
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateOptions {
    /// Minimum intersection ratio to count as visible
    pub ratio: f64,
    /// Pre-trigger margin added around the viewport
    pub margin_px: i32,
    /// Latch on first reveal instead of tracking enter/exit
    pub trigger_once: bool,
    /// Reveal anyway if nothing was reported in this long
    pub force_after: Option<Duration>,
}

impl GateOptions {
    /// Reveal once and stay revealed
    pub fn latched(ratio: f64) -> Self {
        Self {
            ratio,
            margin_px: 0,
            trigger_once: true,
            force_after: None,
        }
    }

    /// Follow every enter and exit
    pub fn live(ratio: f64) -> Self {
        Self {
            trigger_once: false,
            ..Self::latched(ratio)
        }
    }

    /// Latched reveal with the viewport-class thresholds; mobile viewports
    /// also get the forced reveal
    pub fn for_viewport(config: &VisibilityConfig, viewport: Viewport) -> Self {
        let thresholds = config.thresholds_for(viewport);
        let force_after = if viewport.is_mobile(config.mobile_breakpoint_px) {
            config.mobile_force_reveal()
        } else {
            None
        };
        Self {
            ratio: thresholds.ratio,
            margin_px: thresholds.margin_px,
            trigger_once: true,
            force_after,
        }
    }

    pub fn with_margin(mut self, margin_px: i32) -> Self {
        self.margin_px = margin_px;
        self
    }

    pub fn with_force_after(mut self, delay: Duration) -> Self {
        self.force_after = Some(delay);
        self
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            ratio: self.ratio,
            margin_px: self.margin_px,
        }
    }
}

/// Visibility bookkeeping for one observed region.
///
/// In latched mode `has_been_visible` flips to `true` at most once and
/// never reverts. In live mode it follows the region in and out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityState {
    pub has_been_visible: bool,
    pub thresholds: Thresholds,
}

impl VisibilityState {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            has_been_visible: false,
            thresholds,
        }
    }

    /// Feed one intersection sample; returns the new visibility if it flipped
    pub fn apply(&mut self, ratio: f64, trigger_once: bool) -> Option<bool> {
        if !self.has_been_visible {
            if ratio > 0.0 && ratio >= self.thresholds.ratio {
                self.has_been_visible = true;
                return Some(true);
            }
            return None;
        }

        if !trigger_once && ratio <= 0.0 {
            self.has_been_visible = false;
            return Some(false);
        }
        None
    }

    /// Mark visible regardless of intersection; returns whether it flipped
    pub fn force(&mut self) -> bool {
        let flipped = !self.has_been_visible;
        self.has_been_visible = true;
        flipped
    }
}

/// Reports when a region of the page comes into view
pub struct VisibilityGate {
    target: String,
    options: GateOptions,
    visible_rx: watch::Receiver<bool>,
    scope: TaskScope,
}

impl VisibilityGate {
    /// Begin observing `target`.
    ///
    /// When the source cannot observe, the gate reveals unconditionally
    /// after `fallback` instead.
    pub fn observe(
        source: &dyn IntersectionSource,
        target: &str,
        options: GateOptions,
        fallback: Duration,
    ) -> Self {
        let (visible_tx, visible_rx) = watch::channel(false);
        let mut scope = TaskScope::new("visibility-gate");
        let name = target.to_string();

        match source.observe(target, options.margin_px) {
            Ok(stream) => {
                scope.spawn(follow_intersections(name, stream, options, fallback, visible_tx));
            }
            Err(e) => {
                warn!(element = %name, error = %e, "Falling back to timed reveal");
                scope.spawn(timed_reveal(name, fallback, visible_tx));
            }
        }

        Self {
            target: target.to_string(),
            options,
            visible_rx,
            scope,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn options(&self) -> &GateOptions {
        &self.options
    }

    /// Current visibility
    pub fn is_visible(&self) -> bool {
        *self.visible_rx.borrow()
    }

    /// Stream of visibility changes
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.visible_rx.clone()
    }

    /// Stop observing. Returns `false` if already torn down.
    pub fn teardown(&mut self) -> bool {
        self.scope.teardown()
    }
}

async fn sleep_or_never(delay: Option<Duration>) {
    match delay {
        Some(delay) => tokio::time::sleep(delay).await,
        None => std::future::pending::<()>().await,
    }
}

async fn timed_reveal(target: String, delay: Duration, visible_tx: watch::Sender<bool>) {
    tokio::time::sleep(delay).await;
    info!(element = %target, "Timed reveal");
    visible_tx.send_replace(true);
}

async fn follow_intersections(
    target: String,
    mut stream: IntersectionStream,
    options: GateOptions,
    fallback: Duration,
    visible_tx: watch::Sender<bool>,
) {
    let mut state = VisibilityState::new(options.thresholds());
    let force = sleep_or_never(options.force_after);
    tokio::pin!(force);
    let mut force_armed = options.force_after.is_some();

    loop {
        tokio::select! {
            entry = stream.recv() => match entry {
                Some(ratio) => {
                    if let Some(visible) = state.apply(ratio, options.trigger_once) {
                        debug!(element = %target, ratio, visible, "Visibility changed");
                        visible_tx.send_replace(visible);
                        if visible && options.trigger_once {
                            return;
                        }
                    }
                }
                None => {
                    if !state.has_been_visible {
                        warn!(element = %target, "Observer closed before reveal");
                        timed_reveal(target, fallback, visible_tx).await;
                    }
                    return;
                }
            },
            _ = &mut force, if force_armed => {
                force_armed = false;
                if state.force() {
                    info!(element = %target, "Forced reveal");
                    visible_tx.send_replace(true);
                    if options.trigger_once {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::observer::testing::ManualIntersections;
    use crate::visibility::observer::ViewportTracker;

    const FALLBACK: Duration = Duration::from_millis(3000);

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[test]
    fn test_state_waits_for_ratio() {
        let mut state = VisibilityState::new(Thresholds { ratio: 0.3, margin_px: 0 });
        assert_eq!(state.apply(0.0, true), None);
        assert_eq!(state.apply(0.05, true), None);
        assert_eq!(state.apply(0.35, true), Some(true));
        assert_eq!(state.apply(0.0, true), None);
        assert!(state.has_been_visible);
    }

    #[test]
    fn test_state_live_mode_rearms() {
        let mut state = VisibilityState::new(Thresholds { ratio: 0.1, margin_px: 0 });
        assert_eq!(state.apply(0.5, false), Some(true));
        assert_eq!(state.apply(0.05, false), None);
        assert_eq!(state.apply(0.0, false), Some(false));
        assert_eq!(state.apply(0.2, false), Some(true));
    }

    #[test]
    fn test_options_for_viewport() {
        let config = VisibilityConfig::default();

        let mobile = GateOptions::for_viewport(&config, Viewport::new(400, 800));
        assert_eq!(mobile.ratio, 0.1);
        assert_eq!(mobile.margin_px, 50);
        assert_eq!(mobile.force_after, Some(Duration::from_millis(3000)));

        let desktop = GateOptions::for_viewport(&config, Viewport::new(1440, 900));
        assert_eq!(desktop.ratio, 0.3);
        assert_eq!(desktop.margin_px, 0);
        assert!(desktop.force_after.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_gate_does_not_fire_below_ratio() {
        let source = ManualIntersections::default();
        let gate = VisibilityGate::observe(&source, "about", GateOptions::latched(0.3), FALLBACK);
        settle().await;

        source.push("about", 0.0);
        settle().await;
        assert!(!gate.is_visible());

        source.push("about", 0.05);
        settle().await;
        assert!(!gate.is_visible());

        source.push("about", 0.35);
        settle().await;
        assert!(gate.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latched_gate_never_reverts() {
        let source = ManualIntersections::default();
        let gate = VisibilityGate::observe(&source, "features", GateOptions::latched(0.1), FALLBACK);
        let rx = gate.subscribe();
        settle().await;

        source.push("features", 0.5);
        settle().await;
        assert!(*rx.borrow());

        source.push("features", 0.0);
        settle().await;
        assert!(gate.is_visible());
        assert!(*rx.borrow());
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_gate_follows_exit() {
        let source = ManualIntersections::default();
        let gate = VisibilityGate::observe(&source, "use-cases", GateOptions::live(0.1), FALLBACK);
        settle().await;

        source.push("use-cases", 0.4);
        settle().await;
        assert!(gate.is_visible());

        source.push("use-cases", 0.0);
        settle().await;
        assert!(!gate.is_visible());

        source.push("use-cases", 0.15);
        settle().await;
        assert!(gate.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_observation_falls_back_to_timer() {
        let source = ViewportTracker::unavailable(Viewport::new(1280, 800));
        let gate = VisibilityGate::observe(&source, "about", GateOptions::latched(0.3), FALLBACK);

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert!(!gate.is_visible());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(gate.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_stream_falls_back_to_timer() {
        let source = ManualIntersections::default();
        let gate = VisibilityGate::observe(&source, "about", GateOptions::latched(0.3), FALLBACK);
        settle().await;

        source.close("about");
        tokio::time::sleep(Duration::from_millis(2990)).await;
        assert!(!gate.is_visible());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(gate.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_forced_reveal() {
        let source = ManualIntersections::default();
        let options = GateOptions::latched(0.1).with_force_after(Duration::from_millis(3000));
        let gate = VisibilityGate::observe(&source, "about", options, FALLBACK);
        settle().await;

        source.push("about", 0.0);
        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert!(!gate.is_visible());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(gate.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_fallback() {
        let source = ViewportTracker::unavailable(Viewport::new(1280, 800));
        let mut gate = VisibilityGate::observe(&source, "about", GateOptions::latched(0.3), FALLBACK);

        assert!(gate.teardown());
        assert!(!gate.teardown());

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert!(!gate.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_gate_over_tracker_respects_margin() {
        let tracker = ViewportTracker::new(Viewport::new(400, 800));
        tracker.set_layout([
            ("home", crate::viewport::ElementRect::new(0.0, 1000.0)),
            ("about", crate::viewport::ElementRect::new(1000.0, 500.0)),
        ]);
        let options = GateOptions::latched(0.1).with_margin(50);
        let gate = VisibilityGate::observe(&tracker, "about", options, FALLBACK);
        settle().await;
        assert!(!gate.is_visible());

        // Bottom of the viewport sits exactly on the section's top edge; the
        // margin pulls 50 of its 500px into range
        tracker.set_scroll(200.0);
        settle().await;
        assert!(gate.is_visible());
    }
}
