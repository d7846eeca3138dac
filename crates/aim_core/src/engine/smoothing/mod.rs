//! Angle smoothing strategies.
//!
//! Every strategy maps `(from, to, elapsed, total)` to the next rotation and
//! can estimate how many ticks it needs to close a gap. Two families:
//!
//! - **Stepped** (Linear, ConditionalLinear, Acceleration): move a bounded
//!   number of degrees per tick along the straight line toward the target.
//! - **Eased** (Bezier, Sigmoid): cover a fraction of the remaining gap given
//!   by an easing curve over the planned segment length.
//!
//! Both only ever shrink the remaining distance, so no strategy overshoots.
//!
//! ```rust
//! use aim_core::engine::rotation::Rotation;
//! use aim_core::engine::smoothing::{AngleSmooth, LinearSmoothing, SmoothingStrategy};
//!
//! let linear = SmoothingStrategy::Linear(LinearSmoothing { step: 10.0 });
//! let to = Rotation::new(90.0, 0.0);
//! assert_eq!(linear.ticks_required(Rotation::ZERO, to), 9);
//! ```

mod acceleration;
mod easing;
mod linear;

pub use acceleration::AccelerationSmoothing;
pub use easing::{BezierSmoothing, SigmoidSmoothing};
pub use linear::{ConditionFlag, ConditionalLinearSmoothing, LinearSmoothing, TurnCondition};

use crate::engine::rotation::Rotation;
use crate::error::{AimError, Result};
use serde::{Deserialize, Serialize};

/// Gaps at or below this many degrees count as closed.
pub const SNAP_TOLERANCE: f32 = 1e-3;

/// Smallest per-tick step any stepped strategy will take.
pub const MIN_STEP: f32 = 0.05;

/// Upper bound for simulated `ticks_required` estimates.
pub const MAX_PLANNED_TICKS: u32 = 10_000;

pub trait AngleSmooth {
    /// Next rotation on the way from `from` to `to`.
    ///
    /// `elapsed_ticks` counts steps already taken in the current segment,
    /// `total_ticks` is the segment length planned via [`AngleSmooth::ticks_required`].
    fn next_rotation(&self, from: Rotation, to: Rotation, elapsed_ticks: u32, total_ticks: u32)
        -> Rotation;

    /// Ticks needed to close the gap between `from` and `to`.
    fn ticks_required(&self, from: Rotation, to: Rotation) -> u32;
}

/// Closed set of strategies, chosen per aim plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SmoothingStrategy {
    Linear(LinearSmoothing),
    Bezier(BezierSmoothing),
    Sigmoid(SigmoidSmoothing),
    ConditionalLinear(ConditionalLinearSmoothing),
    Acceleration(AccelerationSmoothing),
}

impl Default for SmoothingStrategy {
    fn default() -> Self {
        SmoothingStrategy::Linear(LinearSmoothing::default())
    }
}

impl SmoothingStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            SmoothingStrategy::Linear(_) => "linear",
            SmoothingStrategy::Bezier(_) => "bezier",
            SmoothingStrategy::Sigmoid(_) => "sigmoid",
            SmoothingStrategy::ConditionalLinear(_) => "conditional_linear",
            SmoothingStrategy::Acceleration(_) => "acceleration",
        }
    }

    /// Reject parameters that would stall or blow up the trajectory.
    pub fn validate(&self) -> Result<()> {
        match self {
            SmoothingStrategy::Linear(s) => positive("step", s.step),
            SmoothingStrategy::Bezier(s) => {
                positive("speed", s.speed)?;
                finite("control_in", s.control_in)?;
                finite("control_out", s.control_out)
            }
            SmoothingStrategy::Sigmoid(s) => {
                positive("speed", s.speed)?;
                positive("steepness", s.steepness)
            }
            SmoothingStrategy::ConditionalLinear(s) => {
                positive("fast_step", s.fast_step)?;
                positive("slow_step", s.slow_step)?;
                match &s.condition {
                    TurnCondition::Beyond { degrees } | TurnCondition::Within { degrees } => {
                        non_negative("condition.degrees", *degrees)
                    }
                    TurnCondition::External(_) => Ok(()),
                }
            }
            SmoothingStrategy::Acceleration(s) => {
                positive("initial_speed", s.initial_speed)?;
                non_negative("acceleration", s.acceleration)?;
                positive("max_speed", s.max_speed)
            }
        }
    }

    fn inner(&self) -> &dyn AngleSmooth {
        match self {
            SmoothingStrategy::Linear(s) => s,
            SmoothingStrategy::Bezier(s) => s,
            SmoothingStrategy::Sigmoid(s) => s,
            SmoothingStrategy::ConditionalLinear(s) => s,
            SmoothingStrategy::Acceleration(s) => s,
        }
    }
}

impl AngleSmooth for SmoothingStrategy {
    fn next_rotation(
        &self,
        from: Rotation,
        to: Rotation,
        elapsed_ticks: u32,
        total_ticks: u32,
    ) -> Rotation {
        if !to.is_finite() {
            return if from.is_finite() { from } else { Rotation::ZERO };
        }
        if !from.is_finite() || from.difference(to) <= SNAP_TOLERANCE {
            return to;
        }

        let next = self.inner().next_rotation(from, to, elapsed_ticks, total_ticks);
        if next.is_finite() {
            next
        } else {
            to
        }
    }

    fn ticks_required(&self, from: Rotation, to: Rotation) -> u32 {
        if !from.is_finite() || !to.is_finite() || from.difference(to) <= SNAP_TOLERANCE {
            return 0;
        }
        self.inner().ticks_required(from, to).min(MAX_PLANNED_TICKS)
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AimError::smoothing(field, format!("must be a positive number, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AimError::smoothing(field, format!("must be zero or positive, got {value}")))
    }
}

fn finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AimError::smoothing(field, "must be finite"))
    }
}

/// Move at most `max_step` degrees from `from` toward `to` on a straight line.
pub(crate) fn step_towards(from: Rotation, to: Rotation, max_step: f32) -> Rotation {
    let max_step = max_step.max(MIN_STEP);
    let (yaw, pitch) = from.delta_to(to);
    let distance = yaw.hypot(pitch);

    if !distance.is_finite() || distance <= max_step + SNAP_TOLERANCE {
        return to;
    }

    let scale = max_step / distance;
    Rotation::new(from.yaw + yaw * scale, from.pitch + pitch * scale)
}

/// Cover `fraction` of the remaining gap.
pub(crate) fn advance_fraction(from: Rotation, to: Rotation, fraction: f32) -> Rotation {
    if fraction.is_nan() || fraction >= 1.0 {
        return to;
    }

    let fraction = fraction.max(0.0);
    let (yaw, pitch) = from.delta_to(to);
    if yaw.hypot(pitch) * (1.0 - fraction) <= SNAP_TOLERANCE {
        return to;
    }

    Rotation::new(from.yaw + yaw * fraction, from.pitch + pitch * fraction)
}

/// Ticks for a nominal constant `speed` (degrees/tick) to close the gap.
pub(crate) fn ticks_at_speed(from: Rotation, to: Rotation, speed: f32) -> u32 {
    let distance = from.difference(to);
    if distance <= SNAP_TOLERANCE {
        return 0;
    }

    let ticks = ((distance - SNAP_TOLERANCE) / speed.max(MIN_STEP)).ceil();
    (ticks as u32).clamp(1, MAX_PLANNED_TICKS)
}

/// Count ticks by running the strategy until it reaches `to`.
pub(crate) fn simulate_ticks(strategy: &dyn AngleSmooth, from: Rotation, to: Rotation) -> u32 {
    let mut current = from;
    for tick in 0..MAX_PLANNED_TICKS {
        if current.difference(to) <= SNAP_TOLERANCE {
            return tick;
        }
        current = strategy.next_rotation(current, to, tick, MAX_PLANNED_TICKS);
    }
    MAX_PLANNED_TICKS
}
