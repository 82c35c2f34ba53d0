//! Simulated live waveform for the about section

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::config::WaveformConfig;
use crate::task::TaskScope;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveformPattern {
    #[default]
    Normal,
    Arrhythmic,
    Medicated,
}

impl WaveformPattern {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal Sinus Rhythm",
            Self::Arrhythmic => "Atrial Fibrillation",
            Self::Medicated => "Post-Medication",
        }
    }

    /// Trace colour as `#rrggbb`
    pub fn color(self) -> &'static str {
        match self {
            Self::Normal => "#00ff41",
            Self::Arrhythmic => "#ff4444",
            Self::Medicated => "#44aaff",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Normal => Self::Arrhythmic,
            Self::Arrhythmic => Self::Medicated,
            Self::Medicated => Self::Normal,
        }
    }

    /// Signal value in `[-1, 1]` at horizontal position `x` (view units)
    pub fn sample(self, x: f64) -> f64 {
        use std::f64::consts::TAU;
        match self {
            Self::Normal => (x * TAU / 80.0).sin() * 0.5,
            Self::Arrhythmic => {
                // Irregular beat spacing and amplitude over the first third
                if x < 120.0 {
                    let beat = (x / 30.0).floor();
                    let amp = if beat as i64 % 2 == 0 { 1.0 } else { -0.5 };
                    (x * TAU / 60.0).sin() * amp
                } else {
                    (x * TAU / 80.0).sin() * 0.5
                }
            }
            Self::Medicated => (x * TAU / 100.0).sin() * 0.375,
        }
    }
}

impl fmt::Display for WaveformPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Period of the scan line sweeping across the monitor
pub fn scan_period(config: &WaveformConfig, viewport: Viewport, breakpoint_px: u32) -> Duration {
    let secs = if viewport.is_mobile(breakpoint_px) {
        config.scan_secs_mobile
    } else {
        config.scan_secs_desktop
    };
    Duration::from_secs(secs)
}

/// Rotates through the patterns once its section has been revealed
pub struct WaveformCycler {
    pattern_tx: Arc<watch::Sender<WaveformPattern>>,
    scope: TaskScope,
}

impl WaveformCycler {
    pub fn start(mut visible_rx: watch::Receiver<bool>, interval: Duration) -> Self {
        let pattern_tx = Arc::new(watch::Sender::new(WaveformPattern::Normal));
        let mut scope = TaskScope::new("waveform");

        let tx = Arc::clone(&pattern_tx);
        scope.spawn(async move {
            if visible_rx.wait_for(|visible| *visible).await.is_err() {
                return;
            }
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let next = tx.borrow().next();
                debug!(pattern = %next, "Waveform changed");
                tx.send_replace(next);
            }
        });

        Self { pattern_tx, scope }
    }

    pub fn current(&self) -> WaveformPattern {
        *self.pattern_tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<WaveformPattern> {
        self.pattern_tx.subscribe()
    }

    pub fn teardown(&mut self) -> bool {
        self.scope.teardown()
    }
}
