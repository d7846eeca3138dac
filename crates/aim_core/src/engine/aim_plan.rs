//! Aim Plan - what a producer wants the orientation to do.
//!
//! Plans are immutable once handed to the manager. A changed intent is a new
//! plan; producers usually re-submit one every tick.

use super::agent::Agent;
use super::focus::{FailFocus, ShortStop};
use super::hooks::{Hook, PreTrigger, SingleUseAction};
use super::rotation::Rotation;
use super::smoothing::SmoothingStrategy;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TICKS_UNTIL_RESET: u32 = 5;
pub const DEFAULT_RESET_THRESHOLD: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Where the plan points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum AimTarget {
    /// The plan's fixed rotation
    Rotation,
    /// A world point, re-aimed from the current eyes every tick
    Point(Point3<f32>),
    /// A tracked entity, re-aimed every tick while it exists
    Entity(EntityId),
}

#[derive(Debug, Clone)]
pub struct AimPlan {
    rotation: Rotation,
    target: AimTarget,
    smoothing: SmoothingStrategy,
    pre_trigger: Option<PreTrigger>,
    when_reached: Option<SingleUseAction>,
    short_stop: Option<ShortStop>,
    fail_focus: Option<FailFocus>,
    ticks_until_reset: u32,
    reset_threshold: f32,
    consider_inventory: bool,
    fix_velocity: bool,
    change_look: bool,
}

impl AimPlan {
    pub fn new(rotation: Rotation, smoothing: SmoothingStrategy) -> Self {
        Self {
            rotation,
            target: AimTarget::Rotation,
            smoothing,
            pre_trigger: None,
            when_reached: None,
            short_stop: None,
            fail_focus: None,
            ticks_until_reset: DEFAULT_TICKS_UNTIL_RESET,
            reset_threshold: DEFAULT_RESET_THRESHOLD,
            consider_inventory: false,
            fix_velocity: true,
            change_look: false,
        }
    }

    // ---------------------------------------------------------------------
    // Construction (consuming, so a submitted plan can't change)
    // ---------------------------------------------------------------------

    pub fn with_target(mut self, target: AimTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_pre_trigger(mut self, pre_trigger: PreTrigger) -> Self {
        self.pre_trigger = Some(pre_trigger);
        self
    }

    /// Hook run once the gap to the target closes.
    pub fn when_reached(mut self, hook: Hook) -> Self {
        self.when_reached = Some(SingleUseAction::new(hook));
        self
    }

    /// Share an existing single-use action (e.g. across re-submitted plans).
    pub fn with_reached_action(mut self, action: SingleUseAction) -> Self {
        self.when_reached = Some(action);
        self
    }

    pub fn with_short_stop(mut self, short_stop: ShortStop) -> Self {
        self.short_stop = Some(short_stop);
        self
    }

    pub fn with_fail_focus(mut self, fail_focus: FailFocus) -> Self {
        self.fail_focus = Some(fail_focus);
        self
    }

    pub fn with_reset(mut self, ticks_until_reset: u32, reset_threshold: f32) -> Self {
        self.ticks_until_reset = ticks_until_reset.max(1);
        self.reset_threshold = if reset_threshold.is_finite() {
            reset_threshold.max(0.0)
        } else {
            DEFAULT_RESET_THRESHOLD
        };
        self
    }

    pub fn considering_inventory(mut self, consider: bool) -> Self {
        self.consider_inventory = consider;
        self
    }

    pub fn with_fix_velocity(mut self, fix: bool) -> Self {
        self.fix_velocity = fix;
        self
    }

    pub fn with_change_look(mut self, change_look: bool) -> Self {
        self.change_look = change_look;
        self
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn target(&self) -> AimTarget {
        self.target
    }

    pub fn target_entity(&self) -> Option<EntityId> {
        match self.target {
            AimTarget::Entity(id) => Some(id),
            _ => None,
        }
    }

    pub fn smoothing(&self) -> &SmoothingStrategy {
        &self.smoothing
    }

    pub fn pre_trigger(&self) -> Option<&PreTrigger> {
        self.pre_trigger.as_ref()
    }

    pub fn reached_action(&self) -> Option<&SingleUseAction> {
        self.when_reached.as_ref()
    }

    pub fn short_stop(&self) -> Option<&ShortStop> {
        self.short_stop.as_ref()
    }

    pub fn fail_focus(&self) -> Option<&FailFocus> {
        self.fail_focus.as_ref()
    }

    pub fn ticks_until_reset(&self) -> u32 {
        self.ticks_until_reset
    }

    pub fn reset_threshold(&self) -> f32 {
        self.reset_threshold
    }

    pub fn consider_inventory(&self) -> bool {
        self.consider_inventory
    }

    pub fn fix_velocity(&self) -> bool {
        self.fix_velocity
    }

    /// Immediate commit: the agent's own heading follows every step.
    pub fn change_look(&self) -> bool {
        self.change_look
    }

    /// Arbitration TTL. Immediate-commit plans hold control for a single tick.
    pub fn ttl_ticks(&self) -> u32 {
        if self.change_look {
            1
        } else {
            self.ticks_until_reset
        }
    }

    /// Target rotation as seen from `eyes`. Not normalized for fixed targets.
    pub fn resolve_target(&self, eyes: &Point3<f32>, agent: &dyn Agent) -> Rotation {
        match self.target {
            AimTarget::Rotation => self.rotation,
            AimTarget::Point(point) => Rotation::looking_at(eyes, &point),
            AimTarget::Entity(id) => agent
                .entity_position(id)
                .map(|pos| Rotation::looking_at(eyes, &pos))
                .unwrap_or(self.rotation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::smoothing::{LinearSmoothing, SmoothingStrategy};

    struct Still {
        entity: Option<Point3<f32>>,
    }

    impl Agent for Still {
        fn rotation(&self) -> Rotation {
            Rotation::ZERO
        }

        fn eye_position(&self) -> Point3<f32> {
            Point3::origin()
        }

        fn entity_position(&self, _entity: EntityId) -> Option<Point3<f32>> {
            self.entity
        }
    }

    fn plan() -> AimPlan {
        AimPlan::new(
            Rotation::new(45.0, 10.0),
            SmoothingStrategy::Linear(LinearSmoothing { step: 10.0 }),
        )
    }

    #[test]
    fn test_ttl_follows_change_look() {
        let plan = plan().with_reset(7, 3.0);
        assert_eq!(plan.ttl_ticks(), 7);
        assert_eq!(plan.with_change_look(true).ttl_ticks(), 1);
    }

    #[test]
    fn test_with_reset_sanitizes() {
        let plan = plan().with_reset(0, f32::NAN);
        assert_eq!(plan.ticks_until_reset(), 1);
        assert_eq!(plan.reset_threshold(), DEFAULT_RESET_THRESHOLD);
    }

    #[test]
    fn test_resolve_point_target() {
        let agent = Still { entity: None };
        let plan = plan().with_target(AimTarget::Point(Point3::new(-3.0, 0.0, 0.0)));
        let rot = plan.resolve_target(&Point3::origin(), &agent);
        assert!(rot.difference(Rotation::new(90.0, 0.0)) < 1e-3);
    }

    #[test]
    fn test_resolve_entity_falls_back_to_rotation() {
        let plan = plan().with_target(AimTarget::Entity(EntityId(4)));
        assert_eq!(plan.target_entity(), Some(EntityId(4)));

        let gone = Still { entity: None };
        assert_eq!(plan.resolve_target(&Point3::origin(), &gone), plan.rotation());

        let present = Still { entity: Some(Point3::new(0.0, 0.0, 8.0)) };
        let rot = plan.resolve_target(&Point3::origin(), &present);
        assert!(rot.difference(Rotation::ZERO) < 1e-3);
    }
}
