//! Collaborator seams polled by the orientation manager every tick.

use super::aim_plan::EntityId;
use super::rotation::Rotation;
use nalgebra::Point3;
use std::sync::atomic::{AtomicBool, Ordering};

/// Result of simulating the agent one tick ahead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lookahead {
    /// Eye position after the simulated movement tick
    pub eye_position: Point3<f32>,
    /// `false` if turning this tick would have no effect
    pub rotation_meaningful: bool,
}

/// The agent whose orientation is being arbitrated.
pub trait Agent {
    /// Natural (unforced) heading, as driven by the agent's own input.
    fn rotation(&self) -> Rotation;

    fn eye_position(&self) -> Point3<f32>;

    /// Current position of an entity a plan may be tracking.
    fn entity_position(&self, _entity: EntityId) -> Option<Point3<f32>> {
        None
    }

    /// Run the movement pipeline one tick ahead under `heading` without
    /// committing anything.
    fn simulate_tick(&self, _heading: Rotation) -> Lookahead {
        Lookahead { eye_position: self.eye_position(), rotation_meaningful: true }
    }

    /// A blocking container/UI screen is open.
    fn modal_open(&self) -> bool {
        false
    }

    /// Something outside the engine asked to freeze rotation updates.
    fn rotation_paused(&self) -> bool {
        false
    }
}

/// "Are we currently operating under induced delay?"
pub trait LatencySignal: Send + Sync {
    fn induced_delay(&self) -> bool;
}

/// Transport that never withholds packets.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInducedDelay;

impl LatencySignal for NoInducedDelay {
    fn induced_delay(&self) -> bool {
        false
    }
}

impl LatencySignal for AtomicBool {
    fn induced_delay(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}
