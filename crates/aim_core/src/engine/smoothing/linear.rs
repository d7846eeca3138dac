use super::{simulate_ticks, step_towards, ticks_at_speed, AngleSmooth};
use crate::engine::rotation::Rotation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Constant angular step per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearSmoothing {
    /// Degrees per tick
    pub step: f32,
}

impl Default for LinearSmoothing {
    fn default() -> Self {
        Self { step: 30.0 }
    }
}

impl AngleSmooth for LinearSmoothing {
    fn next_rotation(&self, from: Rotation, to: Rotation, _elapsed: u32, _total: u32) -> Rotation {
        step_towards(from, to, self.step)
    }

    fn ticks_required(&self, from: Rotation, to: Rotation) -> u32 {
        ticks_at_speed(from, to, self.step)
    }
}

/// Shared switch a producer flips to steer a [`TurnCondition::External`].
#[derive(Clone, Default)]
pub struct ConditionFlag(Arc<AtomicBool>);

impl ConditionFlag {
    pub fn new(initial: bool) -> Self {
        Self(Arc::new(AtomicBool::new(initial)))
    }

    pub fn set(&self, value: bool) {
        self.0.store(value, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl fmt::Debug for ConditionFlag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("ConditionFlag").field(&self.is_set()).finish()
    }
}

/// Two flags are equal only if they are the same switch.
impl PartialEq for ConditionFlag {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// When the fast step of a [`ConditionalLinearSmoothing`] applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnCondition {
    /// Remaining gap larger than `degrees`
    Beyond { degrees: f32 },
    /// Remaining gap at most `degrees`
    Within { degrees: f32 },
    /// Driven by a producer at runtime; not part of persisted config.
    #[serde(skip)]
    External(ConditionFlag),
}

impl TurnCondition {
    pub fn holds(&self, from: Rotation, to: Rotation) -> bool {
        match self {
            TurnCondition::Beyond { degrees } => from.difference(to) > *degrees,
            TurnCondition::Within { degrees } => from.difference(to) <= *degrees,
            TurnCondition::External(flag) => flag.is_set(),
        }
    }
}

/// Linear, but the step depends on a predicate evaluated every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionalLinearSmoothing {
    pub fast_step: f32,
    pub slow_step: f32,
    pub condition: TurnCondition,
}

impl Default for ConditionalLinearSmoothing {
    fn default() -> Self {
        Self {
            fast_step: 40.0,
            slow_step: 10.0,
            condition: TurnCondition::Beyond { degrees: 30.0 },
        }
    }
}

impl ConditionalLinearSmoothing {
    fn step_for(&self, from: Rotation, to: Rotation) -> f32 {
        if self.condition.holds(from, to) {
            self.fast_step
        } else {
            self.slow_step
        }
    }
}

impl AngleSmooth for ConditionalLinearSmoothing {
    fn next_rotation(&self, from: Rotation, to: Rotation, _elapsed: u32, _total: u32) -> Rotation {
        step_towards(from, to, self.step_for(from, to))
    }

    fn ticks_required(&self, from: Rotation, to: Rotation) -> u32 {
        simulate_ticks(self, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_diagonal_keeps_straight_line() {
        let linear = LinearSmoothing { step: 5.0 };
        let next = linear.next_rotation(Rotation::ZERO, Rotation::new(30.0, 40.0), 0, 10);
        // 3-4-5 triangle
        assert!((next.yaw - 3.0).abs() < 1e-4);
        assert!((next.pitch - 4.0).abs() < 1e-4);
        assert_eq!(linear.ticks_required(Rotation::ZERO, Rotation::new(30.0, 40.0)), 10);
    }

    #[test]
    fn test_conditional_switches_step_near_target() {
        let smooth = ConditionalLinearSmoothing::default();
        let to = Rotation::new(100.0, 0.0);

        // 100° away: fast (40°)
        let first = smooth.next_rotation(Rotation::ZERO, to, 0, 0);
        assert!((first.yaw - 40.0).abs() < 1e-3);

        // 30° away: slow (10°)
        let near = smooth.next_rotation(Rotation::new(70.0, 0.0), to, 1, 0);
        assert!((near.yaw - 80.0).abs() < 1e-3);

        // 0 -> 40 -> 80 (fast), then 20° left -> 90 -> 100 (slow)
        assert_eq!(smooth.ticks_required(Rotation::ZERO, to), 4);
    }

    #[test]
    fn test_external_condition_flag() {
        let flag = ConditionFlag::new(false);
        let smooth = ConditionalLinearSmoothing {
            fast_step: 20.0,
            slow_step: 2.0,
            condition: TurnCondition::External(flag.clone()),
        };
        let to = Rotation::new(50.0, 0.0);

        let slow = smooth.next_rotation(Rotation::ZERO, to, 0, 0);
        assert!((slow.yaw - 2.0).abs() < 1e-3);

        flag.set(true);
        let fast = smooth.next_rotation(Rotation::ZERO, to, 0, 0);
        assert!((fast.yaw - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_condition_flag_identity() {
        let a = ConditionFlag::new(true);
        let b = ConditionFlag::new(true);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
