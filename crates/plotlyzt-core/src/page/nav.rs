//! Navigation bar and hero call-to-action behaviour

use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::error::Ignored;
use crate::scroll::{ScrollContext, ScrollOutcome};
use crate::visibility::{ActiveSection, IntersectionSource};

pub const NAV_LINKS: [&str; 6] = [
    "Home",
    "Features",
    "Flow",
    "Use Cases",
    "About Us",
    "Contact Us",
];

/// Anchor id for a nav label: `"About Us"` becomes `"about-us"`
pub fn anchor_id(link: &str) -> String {
    link.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Buttons on the hero banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroAction {
    GetStarted,
    ViewDemo,
}

impl HeroAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::GetStarted => "Get Started",
            Self::ViewDemo => "View Demo",
        }
    }

    /// Nav link the button jumps to
    pub fn link(self) -> &'static str {
        match self {
            Self::GetStarted => "Features",
            Self::ViewDemo => "Flow",
        }
    }
}

pub struct Navigation {
    active: ActiveSection,
    menu_open: bool,
    scroll: ScrollContext,
}

impl Navigation {
    pub fn new(scroll: ScrollContext) -> Self {
        Self {
            active: ActiveSection::new(NAV_LINKS[0]),
            menu_open: false,
            scroll,
        }
    }

    /// Highlight `link` whenever `target` scrolls into view
    pub fn track_section(
        &mut self,
        source: &dyn IntersectionSource,
        link: &str,
        target: &str,
        ratio: f64,
        fallback: Duration,
    ) {
        self.active.track(source, link, target, ratio, fallback);
    }

    /// Follow a nav link: highlight it, close the menu and scroll to its
    /// anchor
    pub fn click(&mut self, link: &str) -> ScrollOutcome {
        if !NAV_LINKS.contains(&link) {
            debug!(link, "Unknown nav link");
            return ScrollOutcome::Ignored(Ignored::UnknownAnchor);
        }
        self.active.set(link);
        self.menu_open = false;
        self.scroll.scroll_to(&anchor_id(link))
    }

    pub fn hero(&mut self, action: HeroAction) -> ScrollOutcome {
        self.click(action.link())
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn active(&self) -> String {
        self.active.current()
    }

    pub fn subscribe_active(&self) -> watch::Receiver<String> {
        self.active.subscribe()
    }

    pub fn teardown(&mut self) -> bool {
        self.active.teardown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScrollConfig;
    use crate::scroll::{SmoothScrollController, SmoothScrollOptions};
    use crate::viewport::{ElementRect, Viewport};
    use crate::visibility::ViewportTracker;
    use std::sync::Arc;

    #[test]
    fn test_anchor_ids() {
        assert_eq!(anchor_id("About Us"), "about-us");
        assert_eq!(anchor_id("Use  Cases"), "use-cases");
        assert_eq!(anchor_id("Home"), "home");
        let anchors: Vec<_> = NAV_LINKS.iter().map(|l| anchor_id(l)).collect();
        assert_eq!(anchors[5], "contact-us");
    }

    fn controller() -> SmoothScrollController {
        let tracker = Arc::new(ViewportTracker::new(Viewport::new(1280, 800)));
        tracker.set_layout(
            NAV_LINKS
                .iter()
                .enumerate()
                .map(|(i, link)| (anchor_id(link), ElementRect::new(i as f64 * 800.0, 800.0))),
        );
        SmoothScrollController::new(tracker)
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_before_scroller_still_highlights() {
        let controller = controller();
        let mut nav = Navigation::new(controller.context());
        nav.toggle_menu();

        assert_eq!(
            nav.click("About Us"),
            ScrollOutcome::Ignored(Ignored::PrematureInvocation)
        );
        assert_eq!(nav.active(), "About Us");
        assert!(!nav.is_menu_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hero_buttons_scroll_to_sections() {
        let controller = controller();
        controller.create(SmoothScrollOptions::from_config(
            &ScrollConfig::default(),
            "smooth-wrapper",
            "smooth-content",
            false,
        ));
        let mut nav = Navigation::new(controller.context());

        assert_eq!(nav.hero(HeroAction::GetStarted), ScrollOutcome::Started { target: 800.0 });
        assert_eq!(nav.active(), "Features");
        assert_eq!(nav.hero(HeroAction::ViewDemo), ScrollOutcome::Started { target: 1600.0 });
        assert_eq!(nav.active(), "Flow");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_link_is_ignored() {
        let controller = controller();
        let mut nav = Navigation::new(controller.context());
        assert_eq!(nav.click("Pricing"), ScrollOutcome::Ignored(Ignored::UnknownAnchor));
        assert_eq!(nav.active(), "Home");
    }
}
