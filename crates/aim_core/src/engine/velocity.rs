//! Velocity fix: keep movement aligned with the intended heading.
//!
//! When the intended rotation differs from the agent's own heading, raw
//! movement input (forward/strafe) would push the agent along the *natural*
//! heading. Re-deriving the velocity from the intended yaw keeps movement
//! consistent with what the remote sees.

use nalgebra::Vector3;

const INPUT_EPS: f32 = 1.0e-7;

/// Turn local movement input (x = strafe, z = forward) into a world velocity for `yaw`.
///
/// **Parameters**:
/// - `movement_input`: local input vector, normalized if longer than 1
/// - `speed`: movement speed multiplier
/// - `yaw`: heading in degrees
pub fn movement_to_velocity(movement_input: Vector3<f32>, speed: f32, yaw: f32) -> Vector3<f32> {
    let len_sq = movement_input.norm_squared();
    if len_sq < INPUT_EPS {
        return Vector3::zeros();
    }

    let input = if len_sq > 1.0 { movement_input.normalize() } else { movement_input };
    let scaled = input * speed;
    let (sin, cos) = yaw.to_radians().sin_cos();

    Vector3::new(
        scaled.x * cos - scaled.z * sin,
        scaled.y,
        scaled.z * cos + scaled.x * sin,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_input_no_velocity() {
        let v = movement_to_velocity(Vector3::zeros(), 1.0, 45.0);
        assert_eq!(v, Vector3::zeros());
    }

    #[test]
    fn test_forward_follows_yaw() {
        let forward = Vector3::new(0.0, 0.0, 1.0);

        let south = movement_to_velocity(forward, 0.5, 0.0);
        assert!((south - Vector3::new(0.0, 0.0, 0.5)).norm() < 1e-5);

        // yaw 90 looks toward -X
        let west = movement_to_velocity(forward, 0.5, 90.0);
        assert!((west - Vector3::new(-0.5, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_long_input_is_normalized() {
        let diagonal = Vector3::new(1.0, 0.0, 1.0);
        let v = movement_to_velocity(diagonal, 1.0, 0.0);
        assert!((v.norm() - 1.0).abs() < 1e-5);
    }
}
