//! Eased strategies: progress follows a curve over the planned segment.
//!
//! Each tick covers `(e(t1) - e(t0)) / (1 - e(t0))` of the *remaining* gap,
//! so a target that moves mid-segment is still approached smoothly and the
//! last planned tick always lands exactly on it.

use super::{advance_fraction, ticks_at_speed, AngleSmooth};
use crate::engine::rotation::Rotation;
use serde::{Deserialize, Serialize};

fn eased_step(
    from: Rotation,
    to: Rotation,
    elapsed: u32,
    total: u32,
    ease: impl Fn(f32) -> f32,
) -> Rotation {
    if total == 0 || elapsed.saturating_add(1) >= total {
        return to;
    }

    let t0 = elapsed as f32 / total as f32;
    let t1 = (elapsed + 1) as f32 / total as f32;
    let (e0, e1) = (ease(t0), ease(t1));

    let remaining = 1.0 - e0;
    let fraction = if remaining <= f32::EPSILON {
        1.0
    } else {
        ((e1 - e0) / remaining).clamp(0.0, 1.0)
    };

    advance_fraction(from, to, fraction)
}

/// Cubic Bezier easing with fixed end points 0 and 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BezierSmoothing {
    /// Nominal degrees per tick, used to size the segment
    pub speed: f32,
    /// First control value (clamped to 0..1)
    pub control_in: f32,
    /// Second control value (clamped to 0..1)
    pub control_out: f32,
}

impl Default for BezierSmoothing {
    /// `(0, 1)` starts and ends with zero slope.
    fn default() -> Self {
        Self { speed: 20.0, control_in: 0.0, control_out: 1.0 }
    }
}

impl BezierSmoothing {
    /// Monotonic on `[0, 1]` for any controls inside `[0, 1]`.
    pub fn ease(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let a = self.control_in.clamp(0.0, 1.0);
        let b = self.control_out.clamp(0.0, 1.0);
        let u = 1.0 - t;

        3.0 * u * u * t * a + 3.0 * u * t * t * b + t * t * t
    }
}

impl AngleSmooth for BezierSmoothing {
    fn next_rotation(&self, from: Rotation, to: Rotation, elapsed: u32, total: u32) -> Rotation {
        eased_step(from, to, elapsed, total, |t| self.ease(t))
    }

    fn ticks_required(&self, from: Rotation, to: Rotation) -> u32 {
        ticks_at_speed(from, to, self.speed)
    }
}

/// Logistic slow-fast-slow easing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigmoidSmoothing {
    /// Nominal degrees per tick, used to size the segment
    pub speed: f32,
    /// Higher = sharper middle section
    pub steepness: f32,
}

impl Default for SigmoidSmoothing {
    fn default() -> Self {
        Self { speed: 20.0, steepness: 10.0 }
    }
}

impl SigmoidSmoothing {
    /// Logistic curve rescaled so that `ease(0) = 0` and `ease(1) = 1`.
    pub fn ease(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let k = self.steepness;
        let logistic = |x: f32| 1.0 / (1.0 + (-x).exp());

        let low = logistic(-k / 2.0);
        let high = logistic(k / 2.0);
        if !(high - low).is_normal() {
            return t;
        }

        ((logistic(k * (t - 0.5)) - low) / (high - low)).clamp(0.0, 1.0)
    }
}

impl AngleSmooth for SigmoidSmoothing {
    fn next_rotation(&self, from: Rotation, to: Rotation, elapsed: u32, total: u32) -> Rotation {
        eased_step(from, to, elapsed, total, |t| self.ease(t))
    }

    fn ticks_required(&self, from: Rotation, to: Rotation) -> u32 {
        ticks_at_speed(from, to, self.speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bezier_ease_endpoints_and_monotonic() {
        for (a, b) in [(0.0, 1.0), (1.0, 0.0), (0.3, 0.3), (0.9, 0.1)] {
            let bezier = BezierSmoothing { speed: 10.0, control_in: a, control_out: b };
            assert!(bezier.ease(0.0).abs() < 1e-6);
            assert!((bezier.ease(1.0) - 1.0).abs() < 1e-6);

            let mut previous = 0.0;
            for i in 1..=100 {
                let e = bezier.ease(i as f32 / 100.0);
                assert!(e >= previous - 1e-6, "controls ({a}, {b}) not monotonic");
                previous = e;
            }
        }
    }

    #[test]
    fn test_bezier_default_has_flat_ends() {
        let bezier = BezierSmoothing::default();
        let h = 1e-3;
        // slope ~ 0 at both ends
        assert!(bezier.ease(h) / h < 0.01);
        assert!((1.0 - bezier.ease(1.0 - h)) / h < 0.01);
    }

    #[test]
    fn test_sigmoid_slow_fast_slow() {
        let sigmoid = SigmoidSmoothing::default();
        let first = sigmoid.ease(0.1) - sigmoid.ease(0.0);
        let middle = sigmoid.ease(0.55) - sigmoid.ease(0.45);
        let last = sigmoid.ease(1.0) - sigmoid.ease(0.9);

        assert!(middle > first);
        assert!(middle > last);
        assert!((sigmoid.ease(0.5) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_eased_last_tick_lands_on_target() {
        let sigmoid = SigmoidSmoothing::default();
        let to = Rotation::new(60.0, -10.0);
        let total = sigmoid.ticks_required(Rotation::ZERO, to);
        assert_eq!(total, 4);

        let mut current = Rotation::ZERO;
        for elapsed in 0..total - 1 {
            current = sigmoid.next_rotation(current, to, elapsed, total);
            assert!(current.difference(to) > 0.0);
        }
        current = sigmoid.next_rotation(current, to, total - 1, total);
        assert_eq!(current, to);
    }

    #[test]
    fn test_eased_follows_moving_target() {
        let bezier = BezierSmoothing::default();
        let first = bezier.next_rotation(Rotation::ZERO, Rotation::new(40.0, 0.0), 1, 4);
        let moved = bezier.next_rotation(Rotation::ZERO, Rotation::new(80.0, 0.0), 1, 4);
        // Same fraction of a larger gap
        assert!((moved.yaw - 2.0 * first.yaw).abs() < 1e-3);
    }
}
