use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::viewport::Viewport;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub intro: IntroConfig,
    #[serde(default)]
    pub visibility: VisibilityConfig,
    #[serde(default)]
    pub flow: FlowConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub switcher: SwitcherConfig,
    #[serde(default)]
    pub waveform: WaveformConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Splash screen timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroConfig {
    /// ECG trace animation length
    #[serde(default = "default_ecg_ms")]
    pub ecg_ms: u64,
    /// Wait after the trace for the last prompt to land
    #[serde(default = "default_prompt_settle_ms")]
    pub prompt_settle_ms: u64,
    /// Splash fade-out before the page shell takes over
    #[serde(default = "default_fade_out_ms")]
    pub fade_out_ms: u64,
    /// Delay between intro completion and showing the hero
    #[serde(default = "default_handoff_delay_ms")]
    pub handoff_delay_ms: u64,
    /// Delay before the first loading prompt appears
    #[serde(default = "default_prompt_initial_delay_ms")]
    pub prompt_initial_delay_ms: u64,
    /// Stagger between loading prompts
    #[serde(default = "default_prompt_interval_ms")]
    pub prompt_interval_ms: u64,
    /// Allow "click anywhere" to skip the intro
    #[serde(default = "default_true")]
    pub skippable: bool,
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            ecg_ms: default_ecg_ms(),
            prompt_settle_ms: default_prompt_settle_ms(),
            fade_out_ms: default_fade_out_ms(),
            handoff_delay_ms: default_handoff_delay_ms(),
            prompt_initial_delay_ms: default_prompt_initial_delay_ms(),
            prompt_interval_ms: default_prompt_interval_ms(),
            skippable: default_true(),
        }
    }
}

impl IntroConfig {
    pub fn handoff_delay(&self) -> Duration {
        Duration::from_millis(self.handoff_delay_ms)
    }
}

/// Intersection ratio and pre-trigger margin for one class of viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub ratio: f64,
    #[serde(default)]
    pub margin_px: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityConfig {
    /// Viewports at or below this width use the mobile thresholds
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint_px: u32,
    #[serde(default = "default_mobile_thresholds")]
    pub mobile: Thresholds,
    #[serde(default = "default_desktop_thresholds")]
    pub desktop: Thresholds,
    /// Ratio for plain section reveals (features, use cases)
    #[serde(default = "default_section_ratio")]
    pub section_ratio: f64,
    /// Ratio at which the contact section takes over the nav highlight
    #[serde(default = "default_contact_ratio")]
    pub contact_ratio: f64,
    /// Timed latch used when intersection observation is unavailable
    #[serde(default = "default_fallback_ms")]
    pub fallback_ms: u64,
    /// Forced reveal for mobile viewports that never report visibility (0 = off)
    #[serde(default = "default_fallback_ms")]
    pub mobile_force_reveal_ms: u64,
    /// Disable to exercise the timed fallback everywhere
    #[serde(default = "default_true")]
    pub observer_enabled: bool,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint_px: default_mobile_breakpoint(),
            mobile: default_mobile_thresholds(),
            desktop: default_desktop_thresholds(),
            section_ratio: default_section_ratio(),
            contact_ratio: default_contact_ratio(),
            fallback_ms: default_fallback_ms(),
            mobile_force_reveal_ms: default_fallback_ms(),
            observer_enabled: default_true(),
        }
    }
}

impl VisibilityConfig {
    /// Thresholds for the given viewport class
    pub fn thresholds_for(&self, viewport: Viewport) -> Thresholds {
        if viewport.is_mobile(self.mobile_breakpoint_px) {
            self.mobile
        } else {
            self.desktop
        }
    }

    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_ms)
    }

    pub fn mobile_force_reveal(&self) -> Option<Duration> {
        (self.mobile_force_reveal_ms > 0).then(|| Duration::from_millis(self.mobile_force_reveal_ms))
    }
}

/// Pinned horizontal flow section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Wait after mount before measuring the container
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Resize events are coalesced over this window
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
    /// Extra scroll distance of the pin, in viewport heights
    #[serde(default = "default_pin_viewports")]
    pub pin_viewports: f64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            resize_debounce_ms: default_resize_debounce_ms(),
            pin_viewports: default_pin_viewports(),
        }
    }
}

/// Easing function type for scroll animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EasingType {
    /// No easing - instant jump
    None,
    /// Linear interpolation
    Linear,
    /// Cubic ease-out (smooth deceleration)
    #[default]
    Cubic,
    /// Quintic ease-out (stronger deceleration)
    Quintic,
    /// Exponential ease-out (very smooth)
    EaseOut,
}

/// Smooth scrolling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Enable smooth scrolling animation
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Catch-up duration for pointer-driven scrolling (smooth = 1.5s)
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    /// Catch-up duration on touch viewports (smoothTouch = 0.5s)
    #[serde(default = "default_touch_duration")]
    pub touch_duration_ms: u64,
    /// Easing function type
    #[serde(default)]
    pub easing: EasingType,
    /// Lines (or px) per scroll step when smooth scrolling is disabled
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u16,
    /// Target frame rate during animation
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Enable speed/lag effects on tagged elements
    #[serde(default = "default_true")]
    pub effects: bool,
    /// Route native scroll through the smoother
    #[serde(default = "default_true")]
    pub normalize_scroll: bool,
    /// Delay between showing the hero and creating the scroller
    #[serde(default = "default_create_delay_ms")]
    pub create_delay_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            touch_duration_ms: default_touch_duration(),
            easing: EasingType::default(),
            scroll_lines: default_scroll_lines(),
            animation_fps: default_animation_fps(),
            effects: default_true(),
            normalize_scroll: default_true(),
            create_delay_ms: default_create_delay_ms(),
        }
    }
}

/// Settle delays for the feature-card panel switchers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitcherConfig {
    #[serde(default = "default_commit_ms")]
    pub commit_ms: u64,
    #[serde(default = "default_cleanup_ms")]
    pub cleanup_ms: u64,
    #[serde(default = "default_video_commit_ms")]
    pub video_commit_ms: u64,
    #[serde(default)]
    pub video_cleanup_ms: u64,
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            commit_ms: default_commit_ms(),
            cleanup_ms: default_cleanup_ms(),
            video_commit_ms: default_video_commit_ms(),
            video_cleanup_ms: 0,
        }
    }
}

/// About-section live waveform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveformConfig {
    #[serde(default = "default_waveform_interval")]
    pub interval_ms: u64,
    #[serde(default = "default_scan_secs_mobile")]
    pub scan_secs_mobile: u64,
    #[serde(default = "default_scan_secs_desktop")]
    pub scan_secs_desktop: u64,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_waveform_interval(),
            scan_secs_mobile: default_scan_secs_mobile(),
            scan_secs_desktop: default_scan_secs_desktop(),
        }
    }
}

/// Mocked upload-and-normalize demo in the features section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Length of one processing session
    #[serde(default = "default_processing_session_ms")]
    pub session_ms: u64,
    /// Time spent on each processing step
    #[serde(default = "default_processing_step_ms")]
    pub step_ms: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            session_ms: default_processing_session_ms(),
            step_ms: default_processing_step_ms(),
        }
    }
}

impl ProcessingConfig {
    pub fn session(&self) -> Duration {
        Duration::from_millis(self.session_ms)
    }

    pub fn step(&self) -> Duration {
        Duration::from_millis(self.step_ms.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Theme name: "dark" or "light"
    #[serde(default = "default_theme_name")]
    pub theme: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            theme: default_theme_name(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plotlyzt")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_ecg_ms() -> u64 {
    4500
}

fn default_prompt_settle_ms() -> u64 {
    200
}

fn default_fade_out_ms() -> u64 {
    1000
}

fn default_handoff_delay_ms() -> u64 {
    200
}

fn default_prompt_initial_delay_ms() -> u64 {
    500
}

fn default_prompt_interval_ms() -> u64 {
    800
}

fn default_mobile_breakpoint() -> u32 {
    768
}

fn default_mobile_thresholds() -> Thresholds {
    Thresholds { ratio: 0.1, margin_px: 50 }
}

fn default_desktop_thresholds() -> Thresholds {
    Thresholds { ratio: 0.3, margin_px: 0 }
}

fn default_section_ratio() -> f64 {
    0.1
}

fn default_contact_ratio() -> f64 {
    0.3
}

fn default_fallback_ms() -> u64 {
    3000
}

fn default_settle_delay_ms() -> u64 {
    500
}

fn default_resize_debounce_ms() -> u64 {
    200
}

fn default_pin_viewports() -> f64 {
    1.0
}

fn default_animation_duration() -> u64 {
    1500
}

fn default_touch_duration() -> u64 {
    500
}

fn default_scroll_lines() -> u16 {
    3
}

fn default_animation_fps() -> u32 {
    60
}

fn default_create_delay_ms() -> u64 {
    100
}

fn default_commit_ms() -> u64 {
    200
}

fn default_cleanup_ms() -> u64 {
    400
}

fn default_video_commit_ms() -> u64 {
    50
}

fn default_waveform_interval() -> u64 {
    3000
}

fn default_scan_secs_mobile() -> u64 {
    6
}

fn default_scan_secs_desktop() -> u64 {
    4
}

fn default_processing_session_ms() -> u64 {
    8000
}

fn default_processing_step_ms() -> u64 {
    2000
}

fn default_tick_rate() -> u64 {
    100
}

fn default_theme_name() -> String {
    "dark".to_string()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path; a missing file yields defaults
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/plotlyzt/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("plotlyzt")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("plotlyzt.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}
