use super::{simulate_ticks, step_towards, AngleSmooth, MIN_STEP};
use crate::engine::rotation::Rotation;
use serde::{Deserialize, Serialize};

/// Turn speed ramps up every tick until it hits `max_speed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccelerationSmoothing {
    /// Degrees per tick on the first tick of a segment
    pub initial_speed: f32,
    /// Degrees per tick added every tick
    pub acceleration: f32,
    /// Cap in degrees per tick
    pub max_speed: f32,
}

impl Default for AccelerationSmoothing {
    fn default() -> Self {
        Self { initial_speed: 5.0, acceleration: 5.0, max_speed: 60.0 }
    }
}

impl AccelerationSmoothing {
    /// Speed on the `elapsed`-th tick of a segment, never below [`MIN_STEP`].
    pub fn speed_at(&self, elapsed: u32) -> f32 {
        let cap = self.max_speed.max(MIN_STEP);
        let speed = self.initial_speed + self.acceleration * elapsed as f32;
        speed.clamp(MIN_STEP, cap)
    }
}

impl AngleSmooth for AccelerationSmoothing {
    fn next_rotation(&self, from: Rotation, to: Rotation, elapsed: u32, _total: u32) -> Rotation {
        step_towards(from, to, self.speed_at(elapsed))
    }

    fn ticks_required(&self, from: Rotation, to: Rotation) -> u32 {
        simulate_ticks(self, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_ramps_and_caps() {
        let accel = AccelerationSmoothing { initial_speed: 2.0, acceleration: 3.0, max_speed: 10.0 };
        assert_eq!(accel.speed_at(0), 2.0);
        assert_eq!(accel.speed_at(1), 5.0);
        assert_eq!(accel.speed_at(2), 8.0);
        assert_eq!(accel.speed_at(3), 10.0);
        assert_eq!(accel.speed_at(1_000), 10.0);
    }

    #[test]
    fn test_speed_never_negative() {
        let accel = AccelerationSmoothing { initial_speed: -5.0, acceleration: -1.0, max_speed: 10.0 };
        assert!(accel.speed_at(0) > 0.0);
        assert!(accel.speed_at(50) > 0.0);
    }

    #[test]
    fn test_ticks_required_counts_ramp() {
        let accel = AccelerationSmoothing { initial_speed: 2.0, acceleration: 3.0, max_speed: 10.0 };
        // 2 + 5 + 8 + 10 = 25, then 10 more -> 5 ticks for 30°
        assert_eq!(accel.ticks_required(Rotation::ZERO, Rotation::new(30.0, 0.0)), 5);
    }
}
