//! Angle & Rotation primitives
//!
//! Degrees everywhere. Yaw follows the usual block-game convention:
//! yaw 0 looks toward +Z, yaw 90 toward -X, positive pitch looks down.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// Pitch is clamped (not wrapped) into `[-PITCH_LIMIT, PITCH_LIMIT]`.
pub const PITCH_LIMIT: f32 = 90.0;

/// Wrap degrees into `[-180, 180)`.
#[inline]
pub fn wrap_degrees(value: f32) -> f32 {
    let mut wrapped = value % 360.0;
    if wrapped >= 180.0 {
        wrapped -= 360.0;
    }
    if wrapped < -180.0 {
        wrapped += 360.0;
    }
    wrapped
}

/// Signed shortest-path delta from `b` to `a`.
#[inline]
pub fn angle_difference(a: f32, b: f32) -> f32 {
    wrap_degrees(a - b)
}

/// A bearing, always stored normalized.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Angle(f32);

impl Angle {
    pub fn new(degrees: f32) -> Self {
        Self(wrap_degrees(degrees))
    }

    pub fn degrees(self) -> f32 {
        self.0
    }
}

impl From<f32> for Angle {
    fn from(degrees: f32) -> Self {
        Angle::new(degrees)
    }
}

impl From<Angle> for f32 {
    fn from(angle: Angle) -> Self {
        angle.0
    }
}

/// Shortest signed delta, never the raw subtraction.
impl Sub for Angle {
    type Output = f32;

    fn sub(self, rhs: Angle) -> f32 {
        angle_difference(self.0, rhs.0)
    }
}

/// A (yaw, pitch) pair.
///
/// May be un-normalized transiently (e.g. straight out of a smoothing step);
/// call [`Rotation::normalize`] before treating it as commit-ready.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Rotation {
    pub const ZERO: Rotation = Rotation { yaw: 0.0, pitch: 0.0 };

    pub const fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    pub fn yaw_angle(self) -> Angle {
        Angle::new(self.yaw)
    }

    /// Yaw folded into `[-180, 180)`, pitch clamped into `[-90, 90]`.
    pub fn normalize(self) -> Self {
        Self {
            yaw: wrap_degrees(self.yaw),
            pitch: self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
        }
    }

    pub fn is_normalized(self) -> bool {
        self.is_finite()
            && (-180.0..180.0).contains(&self.yaw)
            && (-PITCH_LIMIT..=PITCH_LIMIT).contains(&self.pitch)
    }

    pub fn is_finite(self) -> bool {
        self.yaw.is_finite() && self.pitch.is_finite()
    }

    /// (yaw delta, pitch delta) to reach `target`, yaw along the shortest path.
    #[inline]
    pub fn delta_to(self, target: Rotation) -> (f32, f32) {
        (angle_difference(target.yaw, self.yaw), target.pitch - self.pitch)
    }

    /// Angular distance between two rotations.
    pub fn difference(self, other: Rotation) -> f32 {
        let (yaw, pitch) = self.delta_to(other);
        yaw.abs().hypot(pitch.abs())
    }

    /// Rotation that looks from `eyes` at `target`.
    ///
    /// The result is already normalized.
    pub fn looking_at(eyes: &Point3<f32>, target: &Point3<f32>) -> Self {
        let diff = target - eyes;
        let horizontal = (diff.x * diff.x + diff.z * diff.z).sqrt();

        Self {
            yaw: wrap_degrees(diff.z.atan2(diff.x).to_degrees() - 90.0),
            pitch: wrap_degrees(-diff.y.atan2(horizontal).to_degrees()),
        }
    }

    /// Unit look vector for this rotation.
    pub fn direction(self) -> Vector3<f32> {
        let pitch = self.pitch.to_radians();
        let yaw = -self.yaw.to_radians();
        let (yaw_sin, yaw_cos) = yaw.sin_cos();
        let (pitch_sin, pitch_cos) = pitch.sin_cos();

        Vector3::new(yaw_sin * pitch_cos, -pitch_sin, yaw_cos * pitch_cos)
    }

    /// Snap the delta from `reference` to multiples of `gcd`.
    ///
    /// A mouse only moves the view in `gcd`-sized increments.
    pub fn snapped_to(self, reference: Rotation, gcd: f32) -> Self {
        if gcd <= 0.0 || !gcd.is_finite() {
            return self;
        }

        let (yaw, pitch) = reference.delta_to(self);
        Self {
            yaw: reference.yaw + (yaw / gcd).round() * gcd,
            pitch: reference.pitch + (pitch / gcd).round() * gcd,
        }
        .normalize()
    }
}

/// Smallest view step a mouse produces at `sensitivity` (0..1).
pub fn sensitivity_gcd(sensitivity: f32) -> f32 {
    let f = sensitivity * 0.6 + 0.2;
    f * f * f * 8.0 * 0.15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(180.0), -180.0);
        assert_eq!(wrap_degrees(-180.0), -180.0);
        assert!((wrap_degrees(370.0) - 10.0).abs() < 1e-4);
        assert!((wrap_degrees(-190.0) - 170.0).abs() < 1e-4);
        assert!((wrap_degrees(725.0) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_angle_sub_is_shortest_path() {
        let a = Angle::new(170.0);
        let b = Angle::new(-170.0);
        assert!(((b - a) - 20.0).abs() < 1e-4);
        assert!(((a - b) + 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_normalize_clamps_pitch() {
        let rot = Rotation::new(450.0, 120.0).normalize();
        assert!((rot.yaw - 90.0).abs() < 1e-4);
        assert_eq!(rot.pitch, 90.0);
        assert!(rot.is_normalized());
        assert!(!Rotation::new(190.0, 0.0).is_normalized());
    }

    #[test]
    fn test_difference_wraps_yaw() {
        let a = Rotation::new(179.0, 0.0);
        let b = Rotation::new(-179.0, 0.0);
        assert!((a.difference(b) - 2.0).abs() < 1e-4);

        let c = Rotation::new(0.0, 30.0);
        let d = Rotation::new(40.0, 0.0);
        assert!((c.difference(d) - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_looking_at_cardinal_directions() {
        let eyes = Point3::new(0.0, 0.0, 0.0);

        let south = Rotation::looking_at(&eyes, &Point3::new(0.0, 0.0, 5.0));
        assert!(south.difference(Rotation::new(0.0, 0.0)) < 1e-3);

        let west = Rotation::looking_at(&eyes, &Point3::new(-5.0, 0.0, 0.0));
        assert!(west.difference(Rotation::new(90.0, 0.0)) < 1e-3);

        let down = Rotation::looking_at(&eyes, &Point3::new(0.0, -5.0, 0.0));
        assert!((down.pitch - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_direction_matches_looking_at() {
        let eyes = Point3::new(1.0, 64.0, -3.0);
        let rot = Rotation::new(-37.5, 22.0);
        let target = eyes + rot.direction() * 10.0;

        let back = Rotation::looking_at(&eyes, &target);
        assert!(back.difference(rot) < 1e-2);
    }

    #[test]
    fn test_snapped_to_grid() {
        let reference = Rotation::new(10.0, 0.0);
        let gcd = sensitivity_gcd(0.5);
        let snapped = Rotation::new(13.33, 1.1).snapped_to(reference, gcd);

        let steps = (snapped.yaw - reference.yaw) / gcd;
        assert!((steps - steps.round()).abs() < 1e-3);
        assert!(snapped.difference(Rotation::new(13.33, 1.1)) <= gcd);
    }

    #[test]
    fn test_snapped_to_ignores_zero_gcd() {
        let rot = Rotation::new(13.33, 1.1);
        assert_eq!(rot.snapped_to(Rotation::ZERO, 0.0), rot);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Normalizing twice equals normalizing once.
            #[test]
            fn prop_normalize_idempotent(
                yaw in -10_000.0f32..10_000.0f32,
                pitch in -500.0f32..500.0f32
            ) {
                let once = Rotation::new(yaw, pitch).normalize();
                prop_assert!(once.is_normalized());
                prop_assert_eq!(once.normalize(), once);
            }

            /// Shortest-path delta never exceeds half a turn.
            #[test]
            fn prop_angle_difference_bounded(
                a in -1_000.0f32..1_000.0f32,
                b in -1_000.0f32..1_000.0f32
            ) {
                let delta = angle_difference(a, b);
                prop_assert!((-180.0..180.0).contains(&delta));
            }
        }
    }
}
