pub mod config;
pub mod error;
pub mod page;
pub mod progression;
pub mod scroll;
pub mod sequencer;
pub mod switcher;
pub mod task;
pub mod viewport;
pub mod visibility;

pub use config::{AppConfig, EasingType, ScrollConfig};
pub use error::{Error, Ignored, Result};
pub use page::{Page, PagePhase, PageSnapshot};
pub use viewport::{ElementRect, Viewport};
