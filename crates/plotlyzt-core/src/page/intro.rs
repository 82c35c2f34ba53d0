//! Splash screen catalog: stage timings, loading prompts and the ECG trace

use std::time::Duration;

use crate::config::IntroConfig;
use crate::sequencer::Stage;
use crate::viewport::Viewport;

pub const STAGE_ECG: &str = "ecg";
pub const STAGE_PROMPTS: &str = "prompts";
pub const STAGE_FADE_OUT: &str = "fade-out";

pub const LOADING_PROMPTS: [&str; 4] = [
    "Loading dataset...",
    "Optimizing data...",
    "Analyzing patterns...",
    "Plotting visualization...",
];

/// Stages of the splash, in order
pub fn intro_stages(config: &IntroConfig) -> Vec<Stage> {
    vec![
        Stage::new(STAGE_ECG, config.ecg_ms),
        Stage::new(STAGE_PROMPTS, config.prompt_settle_ms),
        Stage::new(STAGE_FADE_OUT, config.fade_out_ms),
    ]
}

/// How many loading prompts are showing `elapsed` into the intro
pub fn visible_prompts(elapsed: Duration, config: &IntroConfig) -> usize {
    let elapsed = elapsed.as_millis() as u64;
    if elapsed < config.prompt_initial_delay_ms {
        return 0;
    }
    let interval = config.prompt_interval_ms.max(1);
    let shown = (elapsed - config.prompt_initial_delay_ms) / interval + 1;
    (shown as usize).min(LOADING_PROMPTS.len())
}

/// Fraction of the ECG trace drawn `elapsed` into the intro
pub fn ecg_progress(elapsed: Duration, config: &IntroConfig) -> f64 {
    if config.ecg_ms == 0 {
        return 1.0;
    }
    (elapsed.as_secs_f64() * 1000.0 / config.ecg_ms as f64).clamp(0.0, 1.0)
}

/// A polyline in a fixed view box; y grows downwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EcgTrace {
    pub view_width: f64,
    pub view_height: f64,
    pub points: &'static [(f64, f64)],
}

const ECG_MOBILE: [(f64, f64); 16] = [
    (0.0, 100.0),
    (206.0, 100.0),
    (218.0, 100.0),
    (224.0, 85.0),
    (233.0, 100.0),
    (245.0, 100.0),
    (253.0, 120.0),
    (268.0, 30.0),
    (280.0, 150.0),
    (295.0, 100.0),
    (308.0, 100.0),
    (317.0, 110.0),
    (327.0, 100.0),
    (340.0, 100.0),
    (456.0, 100.0),
    (530.0, 100.0),
];

const ECG_DESKTOP: [(f64, f64); 16] = [
    (0.0, 100.0),
    (230.0, 100.0),
    (245.0, 100.0),
    (250.0, 85.0),
    (260.0, 100.0),
    (275.0, 100.0),
    (285.0, 120.0),
    (300.0, 30.0),
    (315.0, 150.0),
    (330.0, 100.0),
    (345.0, 100.0),
    (350.0, 110.0),
    (360.0, 100.0),
    (375.0, 100.0),
    (480.0, 100.0),
    (600.0, 100.0),
];

impl EcgTrace {
    pub fn for_viewport(viewport: Viewport, breakpoint_px: u32) -> Self {
        if viewport.is_mobile(breakpoint_px) {
            Self {
                view_width: 500.0,
                view_height: 200.0,
                points: &ECG_MOBILE,
            }
        } else {
            Self {
                view_width: 600.0,
                view_height: 200.0,
                points: &ECG_DESKTOP,
            }
        }
    }

    /// Height of the trace at `x`, linearly interpolated between points
    pub fn y_at(&self, x: f64) -> f64 {
        let baseline = self.view_height / 2.0;
        for pair in self.points.windows(2) {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            if x >= x0 && x <= x1 {
                if x1 == x0 {
                    return y1;
                }
                return y0 + (y1 - y0) * (x - x0) / (x1 - x0);
            }
        }
        baseline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_catalog() {
        let stages = intro_stages(&IntroConfig::default());
        let names: Vec<_> = stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, [STAGE_ECG, STAGE_PROMPTS, STAGE_FADE_OUT]);
        let total: Duration = stages.iter().map(|s| s.duration).sum();
        assert_eq!(total, Duration::from_millis(5700));
    }

    #[test]
    fn test_prompts_are_staggered() {
        let config = IntroConfig::default();
        let at = |ms| visible_prompts(Duration::from_millis(ms), &config);
        assert_eq!(at(499), 0);
        assert_eq!(at(500), 1);
        assert_eq!(at(1299), 1);
        assert_eq!(at(1300), 2);
        assert_eq!(at(2900), 4);
        assert_eq!(at(9000), 4);
    }

    #[test]
    fn test_trace_follows_viewport() {
        let mobile = EcgTrace::for_viewport(Viewport::new(400, 800), 768);
        let desktop = EcgTrace::for_viewport(Viewport::new(1280, 800), 768);
        assert_eq!(mobile.view_width, 500.0);
        assert_eq!(desktop.view_width, 600.0);
        assert_eq!(desktop.y_at(300.0), 30.0);
        assert_eq!(desktop.y_at(100.0), 100.0);
        assert_eq!(desktop.y_at(292.5), 75.0);
    }
}
