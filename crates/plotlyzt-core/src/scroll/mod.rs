//! Smooth scrolling
//!
//! - `easing` - easing curves over `[0, 1]`
//! - `timing` - animation progress and interpolation
//! - `animation` - a single eased scroll animator
//! - `controller` - the page's one smooth-scroll handle and the context
//!   navigation uses to scroll to anchors

pub mod animation;
pub mod controller;
pub mod easing;
pub mod timing;

pub use animation::ScrollAnimator;
pub use controller::{
    parallax_offset, HandleId, ScrollContext, ScrollOutcome, ScrollSurface, SmoothScrollController,
    SmoothScrollOptions,
};
