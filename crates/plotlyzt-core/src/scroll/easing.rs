//! Easing curves mapping animation progress `[0, 1]` to `[0, 1]`

use crate::config::EasingType;

impl EasingType {
    /// Eased position for linear progress `t`
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::None => step(t),
            Self::Linear => t,
            Self::Cubic => ease_out_pow(t, 3),
            Self::Quintic => ease_out_pow(t, 5),
            Self::EaseOut => ease_out_expo(t),
        }
    }
}

#[inline]
fn step(t: f64) -> f64 {
    if t < 1.0 {
        0.0
    } else {
        1.0
    }
}

/// 1 - (1 - t)^n
#[inline]
fn ease_out_pow(t: f64, n: i32) -> f64 {
    1.0 - (1.0 - t).powi(n)
}

/// 1 - 2^(-10t), snapped to 1 at the end
#[inline]
fn ease_out_expo(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [EasingType; 4] = [
        EasingType::Linear,
        EasingType::Cubic,
        EasingType::Quintic,
        EasingType::EaseOut,
    ];

    #[test]
    fn test_curves_start_at_zero_and_end_at_one() {
        for easing in CURVES {
            assert!(easing.apply(0.0).abs() < 1e-3, "{:?} at t=0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-3, "{:?} at t=1", easing);
        }
        assert_eq!(EasingType::None.apply(0.99), 0.0);
        assert_eq!(EasingType::None.apply(1.0), 1.0);
    }

    #[test]
    fn test_ease_out_runs_ahead_of_linear() {
        for easing in [EasingType::Cubic, EasingType::Quintic, EasingType::EaseOut] {
            assert!(easing.apply(0.5) > 0.5, "{:?}", easing);
        }
        assert!((EasingType::Cubic.apply(0.5) - 0.875).abs() < 1e-9);
    }

    #[test]
    fn test_curves_are_monotonic() {
        for easing in CURVES {
            let mut prev = 0.0;
            for i in 0..=20 {
                let v = easing.apply(i as f64 / 20.0);
                assert!(v >= prev, "{:?} not monotonic at step {}", easing, i);
                prev = v;
            }
        }
    }
}
