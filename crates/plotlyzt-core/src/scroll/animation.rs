//! Eased scroll animation
//!
//! The animator is driven by the front end's frame loop: start a move with
//! [`ScrollAnimator::animate_to`] or [`ScrollAnimator::nudge`], then call
//! [`ScrollAnimator::update`] every frame for the current position.

use std::time::Duration;

use tokio::time::Instant;

use super::timing::{is_complete, lerp, progress};
use crate::config::EasingType;

#[derive(Debug, Clone, Copy)]
struct ActiveAnimation {
    start: Instant,
    from: f64,
    to: f64,
}

#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    duration: Duration,
    easing: EasingType,
    animation: Option<ActiveAnimation>,
    position: f64,
    /// Wheel/key steps received since the last frame
    pending_delta: f64,
}

impl ScrollAnimator {
    pub fn new(duration: Duration, easing: EasingType, position: f64) -> Self {
        Self {
            duration,
            easing,
            animation: None,
            position,
            pending_delta: 0.0,
        }
    }

    fn is_smooth(&self) -> bool {
        !self.duration.is_zero() && self.easing != EasingType::None
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Whether the next frame will move anything
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0.0
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Where the current animation will land
    pub fn target(&self) -> f64 {
        self.animation.map(|a| a.to).unwrap_or(self.position)
    }

    /// Jump without animating
    pub fn jump_to(&mut self, position: f64) {
        self.animation = None;
        self.pending_delta = 0.0;
        self.position = position;
    }

    /// Start an animation from the current position towards `target`
    pub fn animate_to(&mut self, target: f64, max_scroll: f64, now: Instant) {
        let target = target.clamp(0.0, max_scroll.max(0.0));
        self.pending_delta = 0.0;

        if !self.is_smooth() {
            self.jump_to(target);
            return;
        }
        if self.position == target {
            self.animation = None;
            return;
        }
        self.animation = Some(ActiveAnimation {
            start: now,
            from: self.position,
            to: target,
        });
    }

    /// Queue a relative move; steps arriving before the next frame are
    /// merged into one animation
    pub fn nudge(&mut self, delta: f64, max_scroll: f64) {
        if !self.is_smooth() {
            let position = (self.position + delta).clamp(0.0, max_scroll.max(0.0));
            self.jump_to(position);
            return;
        }
        self.pending_delta += delta;
    }

    /// Advance to `now` and return the current position
    pub fn update(&mut self, max_scroll: f64, now: Instant) -> f64 {
        let max_scroll = max_scroll.max(0.0);

        if self.pending_delta != 0.0 {
            let target = (self.target() + self.pending_delta).clamp(0.0, max_scroll);
            self.pending_delta = 0.0;
            if target != self.position {
                self.animation = Some(ActiveAnimation {
                    start: now,
                    from: self.position,
                    to: target,
                });
            }
        }

        if let Some(anim) = self.animation {
            if is_complete(anim.start, self.duration, now) {
                self.position = anim.to.min(max_scroll);
                self.animation = None;
            } else {
                let t = self.easing.apply(progress(anim.start, self.duration, now));
                self.position = lerp(anim.from, anim.to, t).min(max_scroll);
            }
        }
        self.position
    }

    pub fn cancel(&mut self) {
        self.animation = None;
        self.pending_delta = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animator(ms: u64) -> ScrollAnimator {
        ScrollAnimator::new(Duration::from_millis(ms), EasingType::Linear, 0.0)
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut a = animator(0);
        a.animate_to(400.0, 1000.0, Instant::now());
        assert_eq!(a.position(), 400.0);
        assert!(!a.is_animating());
    }

    #[test]
    fn test_animation_interpolates_and_lands() {
        let mut a = animator(1000);
        let start = Instant::now();
        a.animate_to(400.0, 1000.0, start);
        assert!(a.is_animating());
        assert_eq!(a.target(), 400.0);

        assert_eq!(a.update(1000.0, start + Duration::from_millis(500)), 200.0);
        assert_eq!(a.update(1000.0, start + Duration::from_millis(1000)), 400.0);
        assert!(!a.is_animating());
    }

    #[test]
    fn test_nudges_are_batched_per_frame() {
        let mut a = animator(100);
        a.nudge(10.0, 200.0);
        a.nudge(10.0, 200.0);
        a.nudge(10.0, 200.0);
        assert!(a.needs_update());

        a.update(200.0, Instant::now());
        assert_eq!(a.target(), 30.0);
    }

    #[test]
    fn test_target_clamped_to_max_scroll() {
        let mut a = animator(100);
        a.jump_to(50.0);
        a.animate_to(300.0, 100.0, Instant::now());
        assert_eq!(a.target(), 100.0);
        a.nudge(-500.0, 100.0);
        a.update(100.0, Instant::now());
        assert_eq!(a.target(), 0.0);
    }
}
