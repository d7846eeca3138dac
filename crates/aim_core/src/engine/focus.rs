//! Deliberate imperfections layered on top of a plan's smoothing.
//!
//! - [`ShortStop`]: stop turning for a few ticks
//! - [`FailFocus`]: aim at a fixed offset from the target for a few ticks
//!
//! Both run on a [`Cadence`] counted in engaged ticks (ticks spent aiming for
//! the same provider and entity without interruption). No randomness: the same
//! engagement always produces the same trajectory.

use super::rotation::Rotation;
use serde::{Deserialize, Serialize};

/// Largest offset (per axis, degrees) a [`FailFocus`] may apply.
pub const MAX_FAIL_OFFSET: f32 = 15.0;

/// `interval` normal ticks, then `duration` ticks with the behaviour applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    pub interval: u32,
    pub duration: u32,
}

impl Cadence {
    /// `interval` is at least 1 so an engagement always starts normally.
    pub fn new(interval: u32, duration: u32) -> Self {
        Self { interval: interval.max(1), duration }
    }

    #[inline]
    pub fn is_active(&self, engaged_tick: u32) -> bool {
        if self.duration == 0 {
            return false;
        }
        let interval = self.interval.max(1);
        let period = interval.saturating_add(self.duration);
        engaged_tick % period >= interval
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortStop {
    pub cadence: Cadence,
}

impl ShortStop {
    pub fn new(cadence: Cadence) -> Self {
        Self { cadence }
    }

    pub fn is_active(&self, engaged_tick: u32) -> bool {
        self.cadence.is_active(engaged_tick)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FailFocus {
    pub cadence: Cadence,
    /// Offset added to the target while active, clamped to [`MAX_FAIL_OFFSET`]
    pub offset: Rotation,
}

impl FailFocus {
    pub fn new(cadence: Cadence, yaw_offset: f32, pitch_offset: f32) -> Self {
        Self { cadence, offset: Rotation::new(yaw_offset, pitch_offset) }
    }

    pub fn is_active(&self, engaged_tick: u32) -> bool {
        self.cadence.is_active(engaged_tick)
    }

    /// Where to aim instead of `target`.
    pub fn offset_target(&self, target: Rotation) -> Rotation {
        let clamp = |v: f32| {
            if v.is_finite() {
                v.clamp(-MAX_FAIL_OFFSET, MAX_FAIL_OFFSET)
            } else {
                0.0
            }
        };
        Rotation::new(target.yaw + clamp(self.offset.yaw), target.pitch + clamp(self.offset.pitch))
            .normalize()
    }
}
