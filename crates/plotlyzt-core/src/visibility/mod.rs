//! Viewport visibility: intersection sources, reveal gates and the active
//! section signal used for navigation highlighting

mod gate;
mod observer;
mod section;

pub use gate::{GateOptions, VisibilityGate, VisibilityState};
pub use observer::{
    AnchorResolver, ElementHandle, IntersectionSource, IntersectionStream, Measure,
    ViewportTracker,
};
pub use section::ActiveSection;

#[cfg(test)]
pub(crate) use observer::testing;
