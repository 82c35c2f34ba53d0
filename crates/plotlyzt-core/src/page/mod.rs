//! The Plotlyzt landing page: every section's reveal gate, the flow track,
//! the feature-card switchers and the shell, wired to one viewport tracker

mod intro;
mod layout;
mod nav;
mod processing;
mod shell;
mod waveform;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::info;

pub use intro::{
    ecg_progress, intro_stages, visible_prompts, EcgTrace, LOADING_PROMPTS, STAGE_ECG,
    STAGE_FADE_OUT, STAGE_PROMPTS,
};
pub use layout::{
    page_layout, section, SectionSpec, ABOUT, CONTACT, FEATURES, FLOW, HOME, SECTIONS, USE_CASES,
};
pub use nav::{anchor_id, HeroAction, Navigation, NAV_LINKS};
pub use processing::{ProcessingDemo, ProcessingState, PROCESSING_FILES, PROCESSING_STEPS};
pub use shell::{PagePhase, PageShell};
pub use waveform::{scan_period, WaveformCycler, WaveformPattern};

use crate::config::AppConfig;
use crate::progression::{PanelSizing, ScrollBoundProgression};
use crate::scroll::{ScrollContext, SmoothScrollController};
use crate::switcher::{ReactivePanelSwitcher, SwitchDelays};
use crate::viewport::Viewport;
use crate::visibility::{GateOptions, ViewportTracker, VisibilityGate};
use crate::{Error, Result};

/// Steps on the flow track, one panel each
pub const FLOW_STEPS: [&str; 4] = [
    "Upload & Sync",
    "Mark & Annotate",
    "Review & Collaborate",
    "Export & Share",
];

/// Images in the interactive chart card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartView {
    Ecg1,
    Ecg2,
    Dual,
}

impl ChartView {
    pub const ALL: [ChartView; 3] = [Self::Ecg1, Self::Ecg2, Self::Dual];

    pub fn label(self) -> &'static str {
        match self {
            Self::Ecg1 => "ECG1",
            Self::Ecg2 => "ECG2",
            Self::Dual => "Dual",
        }
    }
}

impl fmt::Display for ChartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Videos in the event-marking card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkingMode {
    Point,
    Range,
}

impl MarkingMode {
    pub const ALL: [MarkingMode; 2] = [Self::Point, Self::Range];

    pub fn label(self) -> &'static str {
        match self {
            Self::Point => "Point",
            Self::Range => "Range",
        }
    }
}

impl fmt::Display for MarkingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sections with a latched reveal gate
pub const REVEALED_SECTIONS: [&str; 2] = [FEATURES, ABOUT];

/// Point-in-time view of every page signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub viewport: Viewport,
    pub phase: PagePhase,
    pub intro_stage: Option<String>,
    pub hero_visible: bool,
    pub scroller_active: bool,
    pub scroll_y: f64,
    pub active_section: String,
    pub revealed: Vec<&'static str>,
    pub flow_ready: bool,
    pub flow_index: usize,
    pub flow_pinned: bool,
    pub flow_translation: f64,
    pub chart_view: ChartView,
    pub marking_mode: MarkingMode,
    pub waveform: WaveformPattern,
    pub processing: ProcessingState,
}

/// A mounted landing page
pub struct Page {
    config: AppConfig,
    tracker: Arc<ViewportTracker>,
    scroller: Arc<SmoothScrollController>,
    shell: PageShell,
    nav: Navigation,
    reveals: Vec<VisibilityGate>,
    flow: ScrollBoundProgression,
    flow_track: Arc<watch::Sender<f64>>,
    chart_view: ReactivePanelSwitcher<ChartView>,
    marking_mode: ReactivePanelSwitcher<MarkingMode>,
    waveform: WaveformCycler,
    processing: ProcessingDemo,
    torn_down: bool,
}

impl Page {
    /// Lay out the page for `viewport` and start everything. Must be called
    /// inside a tokio runtime.
    pub fn mount(config: AppConfig, viewport: Viewport) -> Self {
        let tracker = if config.visibility.observer_enabled {
            ViewportTracker::new(viewport)
        } else {
            ViewportTracker::unavailable(viewport)
        };
        Self::mount_on(config, Arc::new(tracker))
    }

    /// Mount on an existing tracker; its current viewport is used
    pub fn mount_on(config: AppConfig, tracker: Arc<ViewportTracker>) -> Self {
        let viewport = tracker.viewport();
        tracker.set_layout(page_layout(viewport, &config.flow));

        let visibility = &config.visibility;
        let fallback = visibility.fallback_delay();
        let mobile = viewport.is_mobile(visibility.mobile_breakpoint_px);

        let scroller = Arc::new(SmoothScrollController::new(tracker.clone()));
        let shell = PageShell::start(&config, Arc::clone(&scroller), mobile);

        let mut nav = Navigation::new(scroller.context());
        nav.track_section(
            tracker.as_ref(),
            "Use Cases",
            USE_CASES,
            visibility.section_ratio,
            fallback,
        );
        nav.track_section(
            tracker.as_ref(),
            "Contact Us",
            CONTACT,
            visibility.contact_ratio,
            fallback,
        );

        let reveals = vec![
            VisibilityGate::observe(
                tracker.as_ref(),
                FEATURES,
                GateOptions::latched(visibility.section_ratio),
                fallback,
            ),
            VisibilityGate::observe(
                tracker.as_ref(),
                ABOUT,
                GateOptions::for_viewport(visibility, viewport),
                fallback,
            ),
        ];

        let flow_track = Arc::new(watch::Sender::new(0.0));
        let flow = ScrollBoundProgression::bind(
            Arc::new(tracker.element(FLOW)),
            flow_track.clone(),
            FLOW_STEPS.len(),
            PanelSizing::ViewportWidth,
            tracker.subscribe_scroll(),
            tracker.subscribe_viewport(),
            &config.flow,
        );

        let chart_view = ReactivePanelSwitcher::new(
            "chart-view",
            ChartView::Dual,
            SwitchDelays::image(&config.switcher),
        );
        let marking_mode = ReactivePanelSwitcher::new(
            "marking-mode",
            MarkingMode::Range,
            SwitchDelays::video(&config.switcher),
        );

        let waveform = WaveformCycler::start(
            reveals[1].subscribe(),
            std::time::Duration::from_millis(config.waveform.interval_ms),
        );
        let processing = ProcessingDemo::new(&config.processing);

        info!(
            width = viewport.width,
            height = viewport.height,
            mobile,
            observer = tracker.is_available(),
            "Page mounted"
        );

        Self {
            config,
            tracker,
            scroller,
            shell,
            nav,
            reveals,
            flow,
            flow_track,
            chart_view,
            marking_mode,
            waveform,
            processing,
            torn_down: false,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn tracker(&self) -> &Arc<ViewportTracker> {
        &self.tracker
    }

    pub fn viewport(&self) -> Viewport {
        self.tracker.viewport()
    }

    pub fn is_mobile(&self) -> bool {
        self.viewport()
            .is_mobile(self.config.visibility.mobile_breakpoint_px)
    }

    /// New viewport size: re-layout and notify observers
    pub fn resize(&self, viewport: Viewport) {
        self.tracker.set_viewport(viewport);
        self.tracker.set_layout(page_layout(viewport, &self.config.flow));
    }

    pub fn scroll_y(&self) -> f64 {
        self.tracker.scroll_y()
    }

    /// Wheel or key scrolling
    pub fn scroll_by(&self, delta: f64) {
        self.scroll_context().scroll_by(delta);
    }

    /// Advance smooth scrolling one frame; returns whether more frames are
    /// needed
    pub fn update(&self, now: Instant) -> bool {
        self.scroller.update(now)
    }

    pub fn scroll_context(&self) -> ScrollContext {
        self.scroller.context()
    }

    pub fn scroller(&self) -> &Arc<SmoothScrollController> {
        &self.scroller
    }

    pub fn shell(&self) -> &PageShell {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut PageShell {
        &mut self.shell
    }

    pub fn nav(&self) -> &Navigation {
        &self.nav
    }

    pub fn nav_mut(&mut self) -> &mut Navigation {
        &mut self.nav
    }

    /// Reveal gate of a section
    pub fn gate(&self, section_id: &str) -> Result<&VisibilityGate> {
        self.reveals
            .iter()
            .find(|g| g.target() == section_id)
            .ok_or_else(|| Error::UnknownSection(section_id.to_string()))
    }

    pub fn is_revealed(&self, section_id: &str) -> bool {
        self.gate(section_id).map(|g| g.is_visible()).unwrap_or(true)
    }

    pub fn reveals(&self) -> &[VisibilityGate] {
        &self.reveals
    }

    pub fn flow(&self) -> &ScrollBoundProgression {
        &self.flow
    }

    /// Current horizontal offset of the flow track
    pub fn flow_translation(&self) -> f64 {
        *self.flow_track.borrow()
    }

    pub fn chart_view(&self) -> &ReactivePanelSwitcher<ChartView> {
        &self.chart_view
    }

    pub fn chart_view_mut(&mut self) -> &mut ReactivePanelSwitcher<ChartView> {
        &mut self.chart_view
    }

    pub fn marking_mode(&self) -> &ReactivePanelSwitcher<MarkingMode> {
        &self.marking_mode
    }

    pub fn marking_mode_mut(&mut self) -> &mut ReactivePanelSwitcher<MarkingMode> {
        &mut self.marking_mode
    }

    pub fn waveform(&self) -> &WaveformCycler {
        &self.waveform
    }

    pub fn processing(&self) -> &ProcessingDemo {
        &self.processing
    }

    /// Start (or restart) the mocked upload in the features section
    pub fn start_processing(&mut self) -> bool {
        self.processing.start()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            viewport: self.viewport(),
            phase: self.shell.phase(),
            intro_stage: self.shell.intro_progress().name,
            hero_visible: self.shell.is_hero_visible(),
            scroller_active: self.scroller.is_active(),
            scroll_y: self.scroll_y(),
            active_section: self.nav.active(),
            revealed: REVEALED_SECTIONS
                .into_iter()
                .filter(|id| self.is_revealed(id))
                .collect(),
            flow_ready: self.flow.is_ready(),
            flow_index: self.flow.current_panel_index(),
            flow_pinned: *self.flow.pinned().borrow(),
            flow_translation: self.flow_translation(),
            chart_view: self.chart_view.active_key(),
            marking_mode: self.marking_mode.active_key(),
            waveform: self.waveform.current(),
            processing: self.processing.current(),
        }
    }

    /// [`snapshot`](Self::snapshot) as pretty JSON
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Release every observer, timer and subscription. Returns `false` if
    /// already torn down.
    pub fn teardown(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        self.torn_down = true;

        self.shell.teardown();
        self.nav.teardown();
        for gate in &mut self.reveals {
            gate.teardown();
        }
        self.flow.teardown();
        self.chart_view.teardown();
        self.marking_mode.teardown();
        self.waveform.teardown();
        self.processing.teardown();
        info!("Page torn down");
        true
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::switcher::{SwitchOutcome, SwitchState};
    use std::time::Duration;

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_reveals_sections_on_scroll() {
        let page = Page::mount(AppConfig::default(), Viewport::new(1280, 800));
        advance(1).await;
        assert!(!page.is_revealed(FEATURES));

        // features starts at 800
        page.tracker().set_scroll(400.0);
        advance(1).await;
        assert!(page.is_revealed(FEATURES));
        assert!(!page.is_revealed(ABOUT));
        assert!(matches!(page.gate("pricing"), Err(Error::UnknownSection(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_use_cases_drive_nav_highlight() {
        let page = Page::mount(AppConfig::default(), Viewport::new(1280, 800));
        let layout = page_layout(page.viewport(), &page.config().flow);
        let (_, use_cases) = layout.iter().find(|(id, _)| *id == USE_CASES).copied().unwrap();

        page.tracker().set_scroll(use_cases.top);
        advance(1).await;
        assert_eq!(page.nav().active(), "Use Cases");
    }

    #[tokio::test(start_paused = true)]
    async fn test_contact_section_takes_nav_highlight() {
        let page = Page::mount(AppConfig::default(), Viewport::new(1280, 800));
        advance(1).await;
        assert_eq!(page.nav().active(), "Home");

        // contact-us starts at 6600, which is also the bottom of the page
        page.tracker().set_scroll(6600.0);
        advance(1).await;
        assert_eq!(page.nav().active(), "Contact Us");

        page.tracker().set_scroll(4000.0);
        advance(1).await;
        assert_eq!(page.nav().active(), "Use Cases");
    }

    #[tokio::test(start_paused = true)]
    async fn test_processing_demo_runs_one_session() {
        let mut page = Page::mount(AppConfig::default(), Viewport::new(1280, 800));
        assert!(!page.processing().is_active());

        assert!(page.start_processing());
        advance(2001).await;
        assert_eq!(page.snapshot().processing, ProcessingState { active: true, step: 1 });

        advance(6000).await;
        assert!(!page.processing().is_active());

        page.teardown();
        assert!(!page.start_processing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flow_track_follows_scroll() {
        let page = Page::mount(AppConfig::default(), Viewport::new(1280, 800));
        advance(501).await;

        // flow pins from 2400 over one viewport height
        page.tracker().set_scroll(3200.0);
        advance(1).await;
        assert_eq!(page.flow().current_panel_index(), 3);
        assert_eq!(page.flow_translation(), -3840.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_observer_reveals_after_fallback() {
        let mut config = AppConfig::default();
        config.visibility.observer_enabled = false;
        let page = Page::mount(config, Viewport::new(1280, 800));

        advance(2999).await;
        assert!(!page.is_revealed(FEATURES));
        advance(2).await;
        assert!(page.is_revealed(FEATURES));
        assert!(page.is_revealed(ABOUT));
    }

    #[tokio::test(start_paused = true)]
    async fn test_switchers_start_on_defaults() {
        let mut page = Page::mount(AppConfig::default(), Viewport::new(1280, 800));
        assert_eq!(page.chart_view().active_key(), ChartView::Dual);
        assert_eq!(page.marking_mode().active_key(), MarkingMode::Range);

        assert_eq!(
            page.marking_mode_mut().switch_to(MarkingMode::Point),
            SwitchOutcome::Started
        );
        advance(51).await;
        assert_eq!(page.marking_mode().state(), SwitchState::Idle(MarkingMode::Point));
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_serializes() {
        let page = Page::mount(AppConfig::default(), Viewport::new(1280, 800));
        let snapshot = page.snapshot();
        assert_eq!(snapshot.phase, PagePhase::Loading);
        assert_eq!(snapshot.intro_stage.as_deref(), Some(STAGE_ECG));
        assert_eq!(snapshot.active_section, "Home");

        let json = page.snapshot_json().unwrap();
        assert!(json.contains("\"phase\": \"loading\""));
        assert!(json.contains("\"chart_view\": \"Dual\""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_is_idempotent() {
        let mut page = Page::mount(AppConfig::default(), Viewport::new(1280, 800));
        page.shell_mut().skip_intro();
        advance(400).await;
        assert!(page.scroller().is_active());

        assert!(page.teardown());
        assert!(!page.teardown());
        assert!(!page.scroller().is_active());
    }
}
