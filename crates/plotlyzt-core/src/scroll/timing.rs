//! Animation clock helpers
//!
//! Everything takes an explicit `now` so animations advance under tokio's
//! paused test clock exactly like they do in real time.

use std::time::Duration;

use tokio::time::Instant;

/// Fraction of `duration` elapsed since `start`, clamped to `[0, 1]`
#[inline]
pub fn progress(start: Instant, duration: Duration, now: Instant) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

#[inline]
pub fn is_complete(start: Instant, duration: Duration, now: Instant) -> bool {
    now.saturating_duration_since(start) >= duration
}

#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 100.0, 0.0), 0.0);
        assert_eq!(lerp(100.0, 0.0, 0.25), 75.0);
        assert_eq!(lerp(0.0, 100.0, 1.0), 100.0);
    }

    #[test]
    fn test_progress_against_explicit_now() {
        let start = Instant::now();
        let duration = Duration::from_millis(1000);
        assert_eq!(progress(start, duration, start), 0.0);
        assert_eq!(progress(start, duration, start + Duration::from_millis(250)), 0.25);
        assert_eq!(progress(start, duration, start + Duration::from_secs(9)), 1.0);
        assert!(!is_complete(start, duration, start + Duration::from_millis(999)));
        assert!(is_complete(start, duration, start + duration));
    }

    #[test]
    fn test_zero_duration_is_done() {
        let start = Instant::now();
        assert_eq!(progress(start, Duration::ZERO, start), 1.0);
    }
}
