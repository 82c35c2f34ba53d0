use std::sync::Arc;

use plotlyzt_core::page::{scan_period, ChartView, HeroAction, MarkingMode, PagePhase, NAV_LINKS};
use plotlyzt_core::scroll::ScrollOutcome;
use plotlyzt_core::sequencer::SkipOutcome;
use plotlyzt_core::switcher::SwitchOutcome;
use plotlyzt_core::{AppConfig, Ignored, Page, Viewport};
use tokio::time::Instant;
use tracing::debug;

use crate::input::Action;
use crate::theme::Theme;
use crate::widgets::NavbarWidget;

/// Document pixels per terminal column
pub const CELL_WIDTH_PX: f64 = 8.0;
/// Document pixels per terminal row
pub const CELL_HEIGHT_PX: f64 = 16.0;
/// Rows taken by the navbar and status bar
pub const CHROME_ROWS: u16 = 2;

/// Viewport of the page area in a `cols` x `rows` terminal
pub fn page_viewport(cols: u16, rows: u16) -> Viewport {
    Viewport::new(
        (cols as f64 * CELL_WIDTH_PX) as u32,
        (rows.saturating_sub(CHROME_ROWS) as f64 * CELL_HEIGHT_PX) as u32,
    )
}

#[inline]
pub fn px_to_rows(px: f64) -> i64 {
    (px / CELL_HEIGHT_PX).round() as i64
}

#[inline]
pub fn px_to_cols(px: f64) -> i64 {
    (px / CELL_WIDTH_PX).round() as i64
}

/// Application state
pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub page: Page,
    /// Nav link under the keyboard cursor
    pub nav_cursor: usize,
    pub show_help: bool,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Clock origin for the waveform scan line
    started: Instant,
}

impl App {
    /// Mount the page for a `cols` x `rows` terminal. Must be called inside
    /// a tokio runtime.
    pub fn new(config: Arc<AppConfig>, theme: Theme, cols: u16, rows: u16) -> Self {
        let page = Page::mount(config.as_ref().clone(), page_viewport(cols, rows));
        Self {
            config,
            theme,
            page,
            nav_cursor: 0,
            show_help: false,
            should_quit: false,
            status_message: None,
            started: Instant::now(),
        }
    }

    pub fn phase(&self) -> PagePhase {
        self.page.shell().phase()
    }

    /// Splash or handoff still showing
    pub fn is_loading(&self) -> bool {
        self.phase() != PagePhase::Ready
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.page.resize(page_viewport(cols, rows));
    }

    pub fn skip_intro(&mut self) {
        if let SkipOutcome::Ignored(reason) = self.page.shell_mut().skip_intro() {
            debug!(%reason, "Skip ignored");
        }
    }

    /// Wheel or arrow-key scrolling by terminal rows
    pub fn scroll_rows(&mut self, rows: i32) {
        self.page.scroll_by(rows as f64 * CELL_HEIGHT_PX);
    }

    /// Scroll by a fraction of the page area
    pub fn scroll_pages(&mut self, pages: f64) {
        let height = self.page.viewport().height as f64;
        self.page.scroll_by((height * pages).round());
    }

    pub fn wheel(&mut self, steps: i32) {
        let rows = steps * self.config.scroll.scroll_lines.max(1) as i32;
        self.scroll_rows(rows);
    }

    pub fn next_link(&mut self) {
        self.nav_cursor = (self.nav_cursor + 1) % NAV_LINKS.len();
    }

    pub fn prev_link(&mut self) {
        self.nav_cursor = (self.nav_cursor + NAV_LINKS.len() - 1) % NAV_LINKS.len();
    }

    /// Follow the nav link at `index`
    pub fn follow_link(&mut self, index: usize) {
        let Some(link) = NAV_LINKS.get(index) else {
            return;
        };
        self.nav_cursor = index;
        let outcome = self.page.nav_mut().click(link);
        self.report_scroll(outcome);
    }

    pub fn follow_cursor(&mut self) {
        self.follow_link(self.nav_cursor);
    }

    pub fn hero(&mut self, action: HeroAction) {
        let outcome = self.page.nav_mut().hero(action);
        if let Some(index) = NAV_LINKS.iter().position(|l| *l == action.link()) {
            self.nav_cursor = index;
        }
        self.report_scroll(outcome);
    }

    pub fn toggle_menu(&mut self) {
        self.page.nav_mut().toggle_menu();
    }

    pub fn jump_to_top(&mut self) {
        self.follow_link(0);
    }

    pub fn jump_to_bottom(&mut self) {
        self.follow_link(NAV_LINKS.len() - 1);
    }

    /// Next image in the interactive chart card
    pub fn cycle_chart_view(&mut self) {
        let current = self.page.chart_view().active_key();
        let index = ChartView::ALL.iter().position(|v| *v == current).unwrap_or(0);
        let next = ChartView::ALL[(index + 1) % ChartView::ALL.len()];
        let outcome = self.page.chart_view_mut().switch_to(next);
        self.report_switch(outcome);
    }

    pub fn set_marking_mode(&mut self, mode: MarkingMode) {
        let outcome = self.page.marking_mode_mut().switch_to(mode);
        self.report_switch(outcome);
    }

    /// Restart the mocked upload in the features section
    pub fn start_processing(&mut self) {
        if !self.page.start_processing() {
            debug!("Processing demo unavailable");
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::SkipIntro => self.skip_intro(),
            Action::ScrollDown => self.scroll_rows(1),
            Action::ScrollUp => self.scroll_rows(-1),
            Action::ScrollHalfPageDown => self.scroll_pages(0.5),
            Action::ScrollHalfPageUp => self.scroll_pages(-0.5),
            Action::ScrollPageDown => self.scroll_pages(1.0),
            Action::ScrollPageUp => self.scroll_pages(-1.0),
            Action::JumpToTop => self.jump_to_top(),
            Action::JumpToBottom => self.jump_to_bottom(),
            Action::NavLink(index) => self.follow_link(index),
            Action::NextLink => self.next_link(),
            Action::PrevLink => self.prev_link(),
            Action::FollowLink => self.follow_cursor(),
            Action::ToggleMenu => self.toggle_menu(),
            Action::GetStarted => self.hero(HeroAction::GetStarted),
            Action::ViewDemo => self.hero(HeroAction::ViewDemo),
            Action::CycleChartView => self.cycle_chart_view(),
            Action::MarkingPoint => self.set_marking_mode(MarkingMode::Point),
            Action::MarkingRange => self.set_marking_mode(MarkingMode::Range),
            Action::StartProcessing => self.start_processing(),
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::None => {}
        }
    }

    /// Left click at a terminal cell
    pub fn click(&mut self, column: u16, row: u16) {
        if self.is_loading() {
            self.skip_intro();
            return;
        }
        let cols = (self.page.viewport().width as f64 / CELL_WIDTH_PX) as u16;

        if self.page.nav().is_menu_open() {
            // Dropdown rows sit under the bar inside a border
            match (row as usize).checked_sub(2) {
                Some(index) if index < NAV_LINKS.len() => self.follow_link(index),
                _ => self.page.nav_mut().close_menu(),
            }
            return;
        }

        if row == 0 {
            if self.page.is_mobile() {
                if NavbarWidget::is_menu_button(column, cols) {
                    self.toggle_menu();
                }
            } else if let Some(index) = NavbarWidget::link_at(column) {
                self.follow_link(index);
            }
        }
    }

    /// Position of the waveform scan line in `[0, 1)`
    pub fn scan_fraction(&self) -> f64 {
        let period = scan_period(
            &self.config.waveform,
            self.page.viewport(),
            self.config.visibility.mobile_breakpoint_px,
        );
        if period.is_zero() {
            return 0.0;
        }
        let elapsed = self.started.elapsed().as_secs_f64();
        (elapsed % period.as_secs_f64()) / period.as_secs_f64()
    }

    /// Advance smooth scrolling; returns whether another frame is needed
    pub fn update(&mut self) -> bool {
        self.page.update(Instant::now())
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Current scroll offset in rows
    pub fn scroll_row(&self) -> i64 {
        px_to_rows(self.page.scroll_y())
    }

    fn report_scroll(&mut self, outcome: ScrollOutcome) {
        match outcome {
            ScrollOutcome::Started { .. } => self.clear_status(),
            ScrollOutcome::Ignored(Ignored::PrematureInvocation) => {
                self.set_status("Smooth scrolling is still starting up")
            }
            ScrollOutcome::Ignored(reason) => self.set_status(format!("Not scrolling: {}", reason)),
        }
    }

    fn report_switch(&mut self, outcome: SwitchOutcome) {
        if let SwitchOutcome::Ignored(reason) = outcome {
            debug!(%reason, "Switch ignored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn app() -> App {
        App::new(Arc::new(AppConfig::default()), Theme::dark(), 160, 52)
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[test]
    fn test_terminal_to_viewport() {
        let viewport = page_viewport(160, 52);
        assert_eq!(viewport, Viewport::new(1280, 800));
        assert_eq!(px_to_rows(800.0), 50);
        assert_eq!(px_to_cols(1280.0), 160);
    }

    #[tokio::test(start_paused = true)]
    async fn test_link_before_scroller_reports_status() {
        let mut app = app();
        app.follow_link(1);
        assert_eq!(app.page.nav().active(), "Features");
        assert!(app.status_message.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_skip_then_follow_link() {
        let mut app = app();
        assert!(app.is_loading());
        app.skip_intro();
        advance(400).await;
        assert!(!app.is_loading());

        app.follow_link(2);
        assert!(app.status_message.is_none());
        advance(1500).await;
        app.update();
        assert_eq!(app.page.scroll_y(), 2400.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cursor_wraps() {
        let mut app = app();
        app.prev_link();
        assert_eq!(app.nav_cursor, NAV_LINKS.len() - 1);
        app.next_link();
        assert_eq!(app.nav_cursor, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_navbar_click_follows_link() {
        let mut app = app();
        app.skip_intro();
        advance(400).await;

        let column = NAV_LINKS
            .iter()
            .position(|l| *l == "Contact Us")
            .and_then(|target| (0..160).find(|c| NavbarWidget::link_at(*c) == Some(target)));
        app.click(column.unwrap(), 0);
        assert_eq!(app.page.nav().active(), "Contact Us");
        assert_eq!(app.nav_cursor, NAV_LINKS.len() - 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_during_splash_skips() {
        let mut app = app();
        app.click(10, 10);
        advance(400).await;
        assert_eq!(app.phase(), PagePhase::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_and_help_actions() {
        let mut app = app();
        app.handle_action(Action::ToggleHelp);
        assert!(app.show_help);
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chart_view_cycles_after_settle() {
        let mut app = app();
        app.cycle_chart_view();
        advance(601).await;
        assert_eq!(app.page.chart_view().active_key(), ChartView::Ecg1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_processing_action_restarts_session() {
        let mut app = app();
        app.handle_action(Action::StartProcessing);
        advance(4001).await;
        assert_eq!(app.page.processing().current().step, 2);

        app.handle_action(Action::StartProcessing);
        assert_eq!(app.page.processing().current().step, 0);
        assert!(app.page.processing().is_active());
    }
}
