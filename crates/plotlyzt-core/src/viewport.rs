//! Viewport and element geometry
//!
//! All offsets are document coordinates in abstract pixels. Front ends map
//! their own units (terminal cells) onto these.

use serde::Serialize;

/// Visible window dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Small, fast-scrolling viewports get the mobile thresholds
    #[inline]
    pub fn is_mobile(&self, breakpoint_px: u32) -> bool {
        self.width <= breakpoint_px
    }
}

/// Vertical extent of an element in the document
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ElementRect {
    pub top: f64,
    pub height: f64,
}

impl ElementRect {
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Fraction of `rect` inside the viewport, with the viewport grown by
/// `margin_px` on both edges (a positive margin triggers before the
/// element actually scrolls into view).
pub fn intersection_ratio(rect: ElementRect, scroll_y: f64, viewport_height: f64, margin_px: i32) -> f64 {
    let margin = margin_px as f64;
    let view_top = scroll_y - margin;
    let view_bottom = scroll_y + viewport_height + margin;

    if rect.height <= 0.0 {
        let inside = rect.top >= view_top && rect.top <= view_bottom;
        return if inside { 1.0 } else { 0.0 };
    }

    let overlap = rect.bottom().min(view_bottom) - rect.top.max(view_top);
    (overlap.max(0.0) / rect.height).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_outside_and_inside() {
        let rect = ElementRect::new(1000.0, 500.0);
        assert_eq!(intersection_ratio(rect, 0.0, 800.0, 0), 0.0);
        assert_eq!(intersection_ratio(rect, 1000.0, 800.0, 0), 1.0);
    }

    #[test]
    fn test_ratio_partial() {
        let rect = ElementRect::new(1000.0, 500.0);
        // viewport covers [450, 1250): 250 of 500 visible
        let ratio = intersection_ratio(rect, 450.0, 800.0, 0);
        assert!((ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_margin_triggers_early() {
        let rect = ElementRect::new(1000.0, 500.0);
        // bottom edge at 1000 exactly: nothing visible without margin
        assert_eq!(intersection_ratio(rect, 200.0, 800.0, 0), 0.0);
        let ratio = intersection_ratio(rect, 200.0, 800.0, 50);
        assert!((ratio - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_zero_height_element() {
        let rect = ElementRect::new(100.0, 0.0);
        assert_eq!(intersection_ratio(rect, 0.0, 800.0, 0), 1.0);
        assert_eq!(intersection_ratio(rect, 500.0, 300.0, 0), 0.0);
    }

    #[test]
    fn test_mobile_breakpoint_inclusive() {
        assert!(Viewport::new(768, 1024).is_mobile(768));
        assert!(!Viewport::new(769, 1024).is_mobile(768));
    }
}
