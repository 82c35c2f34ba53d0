//! Mocked signal upload for the features section: two recordings at
//! different rates are "normalized" over a short timed session

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::time::{interval_at, sleep_until, Instant};
use tracing::debug;

use crate::config::ProcessingConfig;
use crate::task::TaskScope;

/// Titles of the processing steps, in order
pub const PROCESSING_STEPS: [&str; 4] = [
    "Input Signals",
    "Resampling to Common Rate",
    "Amplitude Normalization",
    "Normalised Signal Output",
];

/// Files listed under the upload area, with their size and rate
pub const PROCESSING_FILES: [(&str, &str); 2] = [
    ("ecg_patient_a.csv", "1.2 MB • 250Hz"),
    ("ecg_patient_b.csv", "2.8 MB • 500Hz"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProcessingState {
    pub active: bool,
    pub step: usize,
}

impl ProcessingState {
    pub fn title(&self) -> &'static str {
        PROCESSING_STEPS[self.step % PROCESSING_STEPS.len()]
    }

    /// One-line status of the step in progress
    pub fn detail(&self) -> &'static str {
        match self.step {
            0 => "ECG A 250Hz 2.5mV, ECG B 500Hz 1.2mV",
            1 => "Normalizing to 500Hz...",
            2 => "Scaling to common amplitude...",
            _ => "500Hz • 1.8mV • Ready for Analysis",
        }
    }
}

/// Runs one processing session at a time, stepping through
/// [`PROCESSING_STEPS`] until the session ends
pub struct ProcessingDemo {
    state_tx: Arc<watch::Sender<ProcessingState>>,
    scope: TaskScope,
    session: Duration,
    step: Duration,
}

impl ProcessingDemo {
    pub fn new(config: &ProcessingConfig) -> Self {
        Self {
            state_tx: Arc::new(watch::Sender::new(ProcessingState::default())),
            scope: TaskScope::new("processing"),
            session: config.session(),
            step: config.step(),
        }
    }

    /// Start a session, replacing any session still running. Returns `false`
    /// once torn down.
    pub fn start(&mut self) -> bool {
        if self.scope.is_torn_down() {
            debug!("Processing start after teardown");
            return false;
        }
        self.scope.reset();

        let started = Instant::now();
        let session_end = started + self.session;
        let step = self.step;
        let tx = Arc::clone(&self.state_tx);
        tx.send_replace(ProcessingState {
            active: true,
            step: 0,
        });
        debug!(session_ms = self.session.as_millis() as u64, "Processing started");

        self.scope.spawn(async move {
            let mut ticker = interval_at(started + step, step);
            loop {
                tokio::select! {
                    biased;
                    _ = sleep_until(session_end) => break,
                    _ = ticker.tick() => {
                        tx.send_modify(|state| {
                            state.step = (state.step + 1) % PROCESSING_STEPS.len();
                        });
                    }
                }
            }
            tx.send_replace(ProcessingState::default());
            debug!("Processing finished");
        });
        true
    }

    pub fn current(&self) -> ProcessingState {
        *self.state_tx.borrow()
    }

    pub fn is_active(&self) -> bool {
        self.current().active
    }

    pub fn subscribe(&self) -> watch::Receiver<ProcessingState> {
        self.state_tx.subscribe()
    }

    pub fn teardown(&mut self) -> bool {
        self.scope.teardown()
    }
}
