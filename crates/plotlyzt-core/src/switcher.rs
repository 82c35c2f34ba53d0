//! Debounced switching between a small fixed set of panels
//!
//! A switch runs in two timed phases: the new key is committed after the
//! commit delay, then the transition settles after the cleanup delay. While
//! a transition runs, further requests are ignored.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::config::SwitcherConfig;
use crate::error::Ignored;
use crate::task::{lock, TaskScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPhase {
    /// Outgoing panel fading, new key not yet active
    Commit,
    /// New key active, transition effects finishing
    Cleanup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchState<K> {
    Idle(K),
    Transitioning { from: K, to: K, phase: SwitchPhase },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    Started,
    Ignored(Ignored),
}

/// Switch state machine without timers
#[derive(Debug, Clone)]
pub struct PanelSwitch<K> {
    state: SwitchState<K>,
}

impl<K: Clone + PartialEq> PanelSwitch<K> {
    pub fn new(initial: K) -> Self {
        Self {
            state: SwitchState::Idle(initial),
        }
    }

    pub fn state(&self) -> &SwitchState<K> {
        &self.state
    }

    /// The key button states should reflect
    pub fn active_key(&self) -> &K {
        match &self.state {
            SwitchState::Idle(key) => key,
            SwitchState::Transitioning { from, phase: SwitchPhase::Commit, .. } => from,
            SwitchState::Transitioning { to, .. } => to,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, SwitchState::Transitioning { .. })
    }

    /// Begin a transition to `key` unless locked or already there
    pub fn request(&mut self, key: K) -> SwitchOutcome {
        let SwitchState::Idle(current) = &self.state else {
            return SwitchOutcome::Ignored(Ignored::RedundantTransition);
        };
        if *current == key {
            return SwitchOutcome::Ignored(Ignored::RedundantTransition);
        }
        self.state = SwitchState::Transitioning {
            from: current.clone(),
            to: key,
            phase: SwitchPhase::Commit,
        };
        SwitchOutcome::Started
    }

    /// Make the target key active. Returns `false` outside the commit phase.
    pub fn commit(&mut self) -> bool {
        match &mut self.state {
            SwitchState::Transitioning { phase, .. } if *phase == SwitchPhase::Commit => {
                *phase = SwitchPhase::Cleanup;
                true
            }
            _ => false,
        }
    }

    /// Finish the transition and unlock
    pub fn settle(&mut self) -> bool {
        let SwitchState::Transitioning { to, .. } = &self.state else {
            return false;
        };
        self.state = SwitchState::Idle(to.clone());
        true
    }
}

/// Commit and cleanup delays of one switcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchDelays {
    pub commit: Duration,
    pub cleanup: Duration,
}

impl SwitchDelays {
    /// Cross-fading images
    pub fn image(config: &SwitcherConfig) -> Self {
        Self {
            commit: Duration::from_millis(config.commit_ms),
            cleanup: Duration::from_millis(config.cleanup_ms),
        }
    }

    /// Swapping video sources
    pub fn video(config: &SwitcherConfig) -> Self {
        Self {
            commit: Duration::from_millis(config.video_commit_ms),
            cleanup: Duration::from_millis(config.video_cleanup_ms),
        }
    }

    /// Length of the lock window
    pub fn total(&self) -> Duration {
        self.commit + self.cleanup
    }
}

/// A [`PanelSwitch`] driven by timers, publishing its active key
pub struct ReactivePanelSwitcher<K> {
    name: &'static str,
    switch: Arc<Mutex<PanelSwitch<K>>>,
    delays: SwitchDelays,
    active_tx: Arc<watch::Sender<K>>,
    state_tx: Arc<watch::Sender<SwitchState<K>>>,
    scope: TaskScope,
}

impl<K> ReactivePanelSwitcher<K>
where
    K: Clone + PartialEq + Debug + Send + Sync + 'static,
{
    pub fn new(name: &'static str, initial: K, delays: SwitchDelays) -> Self {
        Self {
            name,
            switch: Arc::new(Mutex::new(PanelSwitch::new(initial.clone()))),
            delays,
            active_tx: Arc::new(watch::Sender::new(initial.clone())),
            state_tx: Arc::new(watch::Sender::new(SwitchState::Idle(initial))),
            scope: TaskScope::new(name),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn delays(&self) -> SwitchDelays {
        self.delays
    }

    pub fn active_key(&self) -> K {
        self.active_tx.borrow().clone()
    }

    pub fn state(&self) -> SwitchState<K> {
        self.state_tx.borrow().clone()
    }

    pub fn is_locked(&self) -> bool {
        lock(&self.switch).is_locked()
    }

    pub fn subscribe(&self) -> watch::Receiver<K> {
        self.active_tx.subscribe()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<SwitchState<K>> {
        self.state_tx.subscribe()
    }

    /// Request a switch to `key`
    pub fn switch_to(&mut self, key: K) -> SwitchOutcome {
        if self.scope.is_torn_down() {
            return SwitchOutcome::Ignored(Ignored::RedundantTransition);
        }

        let state = {
            let mut switch = lock(&self.switch);
            if let SwitchOutcome::Ignored(reason) = switch.request(key.clone()) {
                debug!(switcher = self.name, ?key, %reason, "Switch ignored");
                return SwitchOutcome::Ignored(reason);
            }
            switch.state().clone()
        };
        debug!(switcher = self.name, ?key, "Switch started");
        self.state_tx.send_replace(state);

        let switch = Arc::clone(&self.switch);
        let active_tx = Arc::clone(&self.active_tx);
        let state_tx = Arc::clone(&self.state_tx);
        let delays = self.delays;
        self.scope.spawn(async move {
            tokio::time::sleep(delays.commit).await;
            let (active, state) = {
                let mut switch = lock(&switch);
                switch.commit();
                (switch.active_key().clone(), switch.state().clone())
            };
            active_tx.send_replace(active);
            state_tx.send_replace(state);

            tokio::time::sleep(delays.cleanup).await;
            let state = {
                let mut switch = lock(&switch);
                switch.settle();
                switch.state().clone()
            };
            state_tx.send_replace(state);
        });
        SwitchOutcome::Started
    }

    /// Cancel any pending transition timers. Returns `false` if already
    /// torn down.
    pub fn teardown(&mut self) -> bool {
        self.scope.teardown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_delays() -> SwitchDelays {
        SwitchDelays::image(&SwitcherConfig::default())
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[test]
    fn test_switch_machine_phases() {
        let mut switch = PanelSwitch::new("range");
        assert_eq!(
            switch.request("range"),
            SwitchOutcome::Ignored(Ignored::RedundantTransition)
        );
        assert!(!switch.is_locked());

        assert_eq!(switch.request("point"), SwitchOutcome::Started);
        assert_eq!(*switch.active_key(), "range");
        assert!(switch.commit());
        assert!(!switch.commit());
        assert_eq!(*switch.active_key(), "point");
        assert!(switch.settle());
        assert_eq!(*switch.state(), SwitchState::Idle("point"));
        assert!(!switch.settle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_key_is_noop() {
        let mut switcher = ReactivePanelSwitcher::new("mode", "range", image_delays());
        let mut state_rx = switcher.subscribe_state();

        assert_eq!(
            switcher.switch_to("range"),
            SwitchOutcome::Ignored(Ignored::RedundantTransition)
        );
        assert!(!switcher.is_locked());
        assert!(!state_rx.has_changed().unwrap());
        assert_eq!(*state_rx.borrow_and_update(), SwitchState::Idle("range"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_switch_settles_after_both_delays() {
        let mut switcher = ReactivePanelSwitcher::new("mode", "range", image_delays());

        assert_eq!(switcher.switch_to("point"), SwitchOutcome::Started);
        assert_eq!(
            switcher.state(),
            SwitchState::Transitioning {
                from: "range",
                to: "point",
                phase: SwitchPhase::Commit
            }
        );

        advance(201).await;
        assert_eq!(switcher.active_key(), "point");
        assert!(switcher.is_locked());

        advance(400).await;
        assert_eq!(switcher.state(), SwitchState::Idle("point"));
        assert!(!switcher.is_locked());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mid_transition_request_does_not_extend_lock() {
        let mut switcher = ReactivePanelSwitcher::new("mode", "range", image_delays());
        switcher.switch_to("point");

        advance(300).await;
        assert_eq!(
            switcher.switch_to("range"),
            SwitchOutcome::Ignored(Ignored::RedundantTransition)
        );

        // Original window ends at 600ms regardless of the ignored request
        advance(301).await;
        assert_eq!(switcher.state(), SwitchState::Idle("point"));
        assert_eq!(switcher.active_key(), "point");

        assert_eq!(switcher.switch_to("range"), SwitchOutcome::Started);
    }

    #[tokio::test(start_paused = true)]
    async fn test_video_delays() {
        let delays = SwitchDelays::video(&SwitcherConfig::default());
        assert_eq!(delays.total(), Duration::from_millis(50));

        let mut switcher = ReactivePanelSwitcher::new("video", "range", delays);
        switcher.switch_to("point");
        advance(51).await;
        assert_eq!(switcher.state(), SwitchState::Idle("point"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_freezes_switcher() {
        let mut switcher = ReactivePanelSwitcher::new("mode", "range", image_delays());
        switcher.switch_to("point");
        assert!(switcher.teardown());
        assert!(!switcher.teardown());

        advance(1000).await;
        assert_eq!(switcher.active_key(), "range");
        assert!(matches!(switcher.switch_to("point"), SwitchOutcome::Ignored(_)));
    }
}
