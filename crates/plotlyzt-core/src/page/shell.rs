//! Page shell: splash, handoff to the main content, and the lifetime of the
//! smooth scroller

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info};

use super::intro::intro_stages;
use crate::config::AppConfig;
use crate::error::Ignored;
use crate::scroll::{HandleId, SmoothScrollController, SmoothScrollOptions};
use crate::sequencer::{Completion, SkipOutcome, StageProgress, StageSequencer};
use crate::task::TaskScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PagePhase {
    /// Splash running
    Loading,
    /// Intro done, main content about to show
    Handoff,
    /// Main content showing
    Ready,
}

pub struct PageShell {
    intro: StageSequencer,
    skippable: bool,
    phase_tx: Arc<watch::Sender<PagePhase>>,
    hero_tx: Arc<watch::Sender<bool>>,
    scroller: Arc<SmoothScrollController>,
    scope: TaskScope,
}

impl PageShell {
    /// Start the intro. `touch` selects the touch scroller settings.
    pub fn start(config: &AppConfig, scroller: Arc<SmoothScrollController>, touch: bool) -> Self {
        let phase_tx = Arc::new(watch::Sender::new(PagePhase::Loading));
        let hero_tx = Arc::new(watch::Sender::new(false));
        let mut scope = TaskScope::new("page-shell");

        let (done_tx, done_rx) = oneshot::channel();
        let intro = StageSequencer::run("intro", intro_stages(&config.intro), move |how| {
            let _ = done_tx.send(how);
        });

        scope.spawn(handoff(
            done_rx,
            config.intro.handoff_delay(),
            Arc::clone(&phase_tx),
            Arc::clone(&hero_tx),
        ));

        let options = SmoothScrollOptions::from_config(
            &config.scroll,
            "smooth-wrapper",
            "smooth-content",
            touch,
        );
        scope.spawn(manage_scroller(
            hero_tx.subscribe(),
            Arc::clone(&scroller),
            options,
            Duration::from_millis(config.scroll.create_delay_ms),
        ));

        Self {
            intro,
            skippable: config.intro.skippable,
            phase_tx,
            hero_tx,
            scroller,
            scope,
        }
    }

    /// "Click anywhere to skip"
    pub fn skip_intro(&mut self) -> SkipOutcome {
        if !self.skippable {
            debug!("Intro is not skippable");
            return SkipOutcome::Ignored(Ignored::RedundantTransition);
        }
        self.intro.skip()
    }

    /// Show or hide the main content's hero. Hiding destroys the scroller.
    pub fn set_hero_visible(&self, visible: bool) {
        if self.scope.is_torn_down() || self.phase() != PagePhase::Ready {
            return;
        }
        self.hero_tx.send_if_modified(|current| {
            let changed = *current != visible;
            *current = visible;
            changed
        });
    }

    pub fn phase(&self) -> PagePhase {
        *self.phase_tx.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<PagePhase> {
        self.phase_tx.subscribe()
    }

    pub fn is_hero_visible(&self) -> bool {
        *self.hero_tx.borrow()
    }

    pub fn subscribe_hero(&self) -> watch::Receiver<bool> {
        self.hero_tx.subscribe()
    }

    pub fn intro_progress(&self) -> StageProgress {
        self.intro.progress()
    }

    pub fn subscribe_intro(&self) -> watch::Receiver<StageProgress> {
        self.intro.subscribe()
    }

    pub fn intro_elapsed(&self) -> Duration {
        self.intro.elapsed()
    }

    /// Stop the intro, release timers and destroy the scroller. Returns
    /// `false` if already torn down.
    pub fn teardown(&mut self) -> bool {
        if !self.scope.teardown() {
            return false;
        }
        self.intro.teardown();
        self.scroller.destroy_active();
        true
    }
}

async fn handoff(
    done_rx: oneshot::Receiver<Completion>,
    delay: Duration,
    phase_tx: Arc<watch::Sender<PagePhase>>,
    hero_tx: Arc<watch::Sender<bool>>,
) {
    let Ok(how) = done_rx.await else {
        return;
    };
    info!(?how, "Intro complete");
    phase_tx.send_replace(PagePhase::Handoff);

    tokio::time::sleep(delay).await;
    hero_tx.send_replace(true);
    phase_tx.send_replace(PagePhase::Ready);
}

/// Create the scroller shortly after the hero shows and destroy it when the
/// hero goes away
async fn manage_scroller(
    mut hero_rx: watch::Receiver<bool>,
    scroller: Arc<SmoothScrollController>,
    options: SmoothScrollOptions,
    create_delay: Duration,
) {
    let mut handle: Option<HandleId> = None;
    while hero_rx.changed().await.is_ok() {
        let visible = *hero_rx.borrow_and_update();
        if visible {
            if handle.is_some() {
                continue;
            }
            tokio::time::sleep(create_delay).await;
            if !*hero_rx.borrow() {
                continue;
            }
            handle = Some(scroller.create(options.clone()));
        } else if let Some(id) = handle.take() {
            scroller.destroy(id);
        }
    }
}
