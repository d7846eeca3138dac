use crate::engine::aim_plan::{AimPlan, AimTarget};
use crate::engine::focus::{Cadence, FailFocus, ShortStop};
use crate::engine::rotation::Rotation;
use crate::engine::smoothing::{BezierSmoothing, LinearSmoothing, SmoothingStrategy};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Per-producer rotation settings; turned into plans via [`RotationsConfig::to_aim_plan`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RotationsConfig {
    /// 스무딩 전략
    pub smoothing: SmoothingStrategy,
    /// Re-derive movement velocity from the intended yaw
    pub fix_velocity: bool,
    /// Degrees from the natural heading at which control is handed back
    #[validate(range(min = 1.0, max = 180.0))]
    pub reset_threshold: f32,
    /// Ticks a plan stays in control without renewal
    #[validate(range(min = 1, max = 30))]
    pub ticks_until_reset: u32,
    /// Commit every step to the agent's own heading
    pub change_look: bool,
    /// 주기적 회전 정지
    pub short_stop: Option<ShortStop>,
    pub fail_focus: Option<FailFocus>,
}

impl Default for RotationsConfig {
    fn default() -> Self {
        Self {
            smoothing: SmoothingStrategy::default(),
            fix_velocity: true,
            reset_threshold: 2.0,
            ticks_until_reset: 5,
            change_look: false,
            short_stop: None,
            fail_focus: None,
        }
    }
}

impl RotationsConfig {
    /// Field ranges plus strategy parameters.
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        self.smoothing.validate()
    }

    /// Snap straight to the target.
    pub fn instant() -> Self {
        Self {
            smoothing: SmoothingStrategy::Linear(LinearSmoothing { step: 255.0 }),
            ..Self::default()
        }
    }

    /// Eased approach with flat ends, used for combat targets.
    pub fn combat() -> Self {
        Self {
            smoothing: SmoothingStrategy::Bezier(BezierSmoothing::default()),
            ticks_until_reset: 3,
            short_stop: Some(ShortStop::new(Cadence::new(12, 2))),
            ..Self::default()
        }
    }

    /// Visible rotation (the agent's own heading turns).
    pub fn visible() -> Self {
        Self { change_look: true, ..Self::default() }
    }

    pub fn to_aim_plan(
        &self,
        rotation: Rotation,
        target: AimTarget,
        consider_inventory: bool,
    ) -> AimPlan {
        let mut plan = AimPlan::new(rotation, self.smoothing.clone())
            .with_target(target)
            .with_reset(self.ticks_until_reset, self.reset_threshold)
            .considering_inventory(consider_inventory)
            .with_fix_velocity(self.fix_velocity)
            .with_change_look(self.change_look);
        if let Some(short_stop) = self.short_stop {
            plan = plan.with_short_stop(short_stop);
        }
        if let Some(fail_focus) = self.fail_focus {
            plan = plan.with_fail_focus(fail_focus);
        }
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::smoothing::AngleSmooth;

    #[test]
    fn test_default_is_valid() {
        let cfg = RotationsConfig::default();
        assert!(cfg.check().is_ok());
        assert!(RotationsConfig::instant().check().is_ok());
        assert!(RotationsConfig::combat().check().is_ok());
        assert!(RotationsConfig::visible().check().is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let cfg = RotationsConfig { reset_threshold: 0.5, ..Default::default() };
        assert!(cfg.check().is_err());

        let cfg = RotationsConfig { ticks_until_reset: 31, ..Default::default() };
        assert!(cfg.check().is_err());

        let cfg = RotationsConfig {
            smoothing: SmoothingStrategy::Linear(LinearSmoothing { step: -1.0 }),
            ..Default::default()
        };
        assert!(cfg.check().is_err());
    }

    #[test]
    fn test_to_aim_plan_copies_policy() {
        let cfg = RotationsConfig::visible();
        let plan = cfg.to_aim_plan(Rotation::new(10.0, 5.0), AimTarget::Rotation, true);

        assert_eq!(plan.rotation(), Rotation::new(10.0, 5.0));
        assert!(plan.change_look());
        assert!(plan.consider_inventory());
        assert!(plan.fix_velocity());
        assert_eq!(plan.ticks_until_reset(), 5);
        assert_eq!(plan.reset_threshold(), 2.0);
        assert_eq!(plan.ttl_ticks(), 1);
    }

    #[test]
    fn test_focus_behaviours_reach_the_plan() {
        let cfg = RotationsConfig::combat();
        let plan = cfg.to_aim_plan(Rotation::ZERO, AimTarget::Rotation, false);
        assert_eq!(plan.short_stop().map(|s| s.cadence), Some(Cadence::new(12, 2)));
        assert!(plan.fail_focus().is_none());

        let json = r#"{"fail_focus":{"cadence":{"interval":5,"duration":1},"offset":{"yaw":3.0,"pitch":-1.0}}}"#;
        let cfg: RotationsConfig = serde_json::from_str(json).unwrap();
        let plan = cfg.to_aim_plan(Rotation::ZERO, AimTarget::Rotation, false);
        assert_eq!(plan.fail_focus().map(|f| f.offset), Some(Rotation::new(3.0, -1.0)));
    }

    #[test]
    fn test_instant_reaches_in_one_tick() {
        let cfg = RotationsConfig::instant();
        let ticks = cfg.smoothing.ticks_required(Rotation::ZERO, Rotation::new(-180.0, 90.0));
        assert_eq!(ticks, 1);
    }
}
