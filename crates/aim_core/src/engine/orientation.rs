//! Orientation Manager - per-tick driver of the shared orientation.
//!
//! ## Tick order
//! 1. apply submissions queued by hooks during the previous tick
//! 2. read the arbitrator's winner
//! 3. step (Aiming), blend back (Releasing), or follow the agent (Idle)
//! 4. age the arbitrator
//!
//! ## Orientation values
//! - **intended**: smoothing output, what the engine wants the remote to see
//! - **committed**: the agent's authoritative heading
//! - **remote believed**: acknowledged or theoretical, see [`RemoteRotation`]
//!
//! Unless a plan asks for `change_look`, stepping only moves `intended`; the
//! agent keeps its natural heading and the transport sends `outbound`.

use super::agent::{Agent, LatencySignal, NoInducedDelay};
use super::aim_plan::{AimPlan, EntityId};
use super::arbitrator::{Arbitrator, Priority, ProviderId, Submission};
use super::config::ManagerConfig;
use super::hooks::{DeferredSubmission, HookContext};
use super::remote::RemoteRotation;
use super::rotation::Rotation;
use super::smoothing::{AngleSmooth, SmoothingStrategy, SNAP_TOLERANCE};
use super::velocity::movement_to_velocity;
use nalgebra::Vector3;
use serde::Serialize;
use std::sync::Arc;

/// Drift (degrees) of the target away from the one a segment was sized for
/// before the segment is planned again.
pub const RETARGET_TOLERANCE: f32 = 1.0;

/// Progress through one interpolation segment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Segment {
    elapsed: u32,
    total: u32,
    target: Rotation,
}

impl Segment {
    fn plan(strategy: &SmoothingStrategy, from: Rotation, to: Rotation) -> Self {
        Self { elapsed: 0, total: strategy.ticks_required(from, to), target: to }
    }

    /// Still usable for `target`: ticks left and the target has not wandered off.
    fn continues_to(&self, target: Rotation) -> bool {
        self.elapsed < self.total && self.target.difference(target) <= RETARGET_TOLERANCE
    }

    /// Run one step of `strategy` and advance.
    fn step(&mut self, strategy: &SmoothingStrategy, from: Rotation, to: Rotation) -> Rotation {
        let next = strategy.next_rotation(from, to, self.elapsed, self.total).normalize();
        self.elapsed = self.elapsed.saturating_add(1);
        next
    }
}

#[derive(Debug, Clone)]
struct Aim {
    provider: ProviderId,
    plan: AimPlan,
    intended: Rotation,
    segment: Segment,
    /// Uninterrupted ticks spent aiming for `provider`
    engaged: u32,
}

#[derive(Debug, Clone)]
struct Release {
    plan: AimPlan,
    intended: Rotation,
    segment: Segment,
}

#[derive(Debug, Clone, Default)]
enum Phase {
    #[default]
    Idle,
    Aiming(Aim),
    Releasing(Release),
}

impl Phase {
    fn kind(&self) -> PhaseKind {
        match self {
            Phase::Idle => PhaseKind::Idle,
            Phase::Aiming(_) => PhaseKind::Aiming,
            Phase::Releasing(_) => PhaseKind::Releasing,
        }
    }

    fn plan(&self) -> Option<&AimPlan> {
        match self {
            Phase::Idle => None,
            Phase::Aiming(aim) => Some(&aim.plan),
            Phase::Releasing(release) => Some(&release.plan),
        }
    }

    fn intended(&self) -> Option<Rotation> {
        match self {
            Phase::Idle => None,
            Phase::Aiming(aim) => Some(aim.intended),
            Phase::Releasing(release) => Some(release.intended),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Idle,
    Aiming,
    Releasing,
}

/// What one tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub phase: PhaseKind,
    /// Rotation for the outbound look message while the engine is in control.
    /// Already recorded as the theoretical remote rotation.
    pub outbound: Option<Rotation>,
    /// Heading the agent must adopt this tick
    pub look: Option<Rotation>,
    /// A reached-callback fired
    pub reached: bool,
    /// The tick was blocked (pause or modal lock)
    pub suppressed: bool,
}

impl TickReport {
    fn new(tick: u64) -> Self {
        Self {
            tick,
            phase: PhaseKind::Idle,
            outbound: None,
            look: None,
            reached: false,
            suppressed: false,
        }
    }
}

pub struct OrientationManager {
    config: ManagerConfig,
    arbitrator: Arbitrator<ProviderId, Priority, AimPlan>,
    phase: Phase,
    committed: Rotation,
    remote: RemoteRotation,
    latency: Arc<dyn LatencySignal>,
    deferred: Vec<DeferredSubmission>,
    tick: u64,
}

impl Default for OrientationManager {
    fn default() -> Self {
        Self::new(ManagerConfig::default(), RemoteRotation::new(), Arc::new(NoInducedDelay))
    }
}

impl OrientationManager {
    /// `remote` is the handle shared with the transport; `latency` reports
    /// whether outbound traffic is currently being withheld.
    pub fn new(
        config: ManagerConfig,
        remote: RemoteRotation,
        latency: Arc<dyn LatencySignal>,
    ) -> Self {
        Self {
            config,
            arbitrator: Arbitrator::new(),
            phase: Phase::Idle,
            committed: Rotation::ZERO,
            remote,
            latency,
            deferred: Vec::new(),
            tick: 0,
        }
    }

    // ---------------------------------------------------------------------
    // Producer interface
    // ---------------------------------------------------------------------

    pub fn submit_aim_plan(
        &mut self,
        plan: AimPlan,
        priority: Priority,
        provider: ProviderId,
    ) -> Submission {
        let ttl = plan.ttl_ticks();
        let outcome = self.arbitrator.submit(provider, priority, ttl, plan);
        log::trace!("aim plan from {} at {:?} (ttl {}): {:?}", provider, priority, ttl, outcome);
        outcome
    }

    /// Engine output while in control, the committed heading otherwise.
    pub fn current_intended_rotation(&self) -> Rotation {
        self.phase.intended().unwrap_or(self.committed)
    }

    pub fn committed_rotation(&self) -> Rotation {
        self.committed
    }

    /// Rotation the remote peer holds, under the current latency model.
    pub fn remote_believed_rotation(&self) -> Rotation {
        self.remote.believed(self.latency.induced_delay())
    }

    pub fn remote(&self) -> &RemoteRotation {
        &self.remote
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn phase(&self) -> PhaseKind {
        self.phase.kind()
    }

    /// Plan currently being approached or released.
    pub fn working_plan(&self) -> Option<&AimPlan> {
        self.phase.plan()
    }

    /// Arbitration winner right now.
    pub fn active_plan(&self) -> Option<&AimPlan> {
        self.arbitrator.active_request()
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Ticks `strategy` needs from the acknowledged remote rotation to `rotation`.
    pub fn ticks_to_reach(&self, strategy: &SmoothingStrategy, rotation: Rotation) -> u32 {
        strategy.ticks_required(self.remote.snapshot().acknowledged, rotation.normalize())
    }

    /// Velocity contributed by `movement_input`, re-derived from the intended
    /// yaw when the working plan asks for it; `velocity` unchanged otherwise.
    pub fn fix_velocity(
        &self,
        velocity: Vector3<f32>,
        movement_input: Vector3<f32>,
        speed: f32,
    ) -> Vector3<f32> {
        let fixing = self.phase.plan().is_some_and(AimPlan::fix_velocity);
        match self.phase.intended() {
            Some(intended) if fixing => movement_to_velocity(movement_input, speed, intended.yaw),
            _ => velocity,
        }
    }

    /// Forced teardown (transport lost): back to Idle with nothing pending.
    pub fn reset(&mut self) {
        let dropped = self.arbitrator.len() + self.deferred.len();
        self.phase = Phase::Idle;
        self.arbitrator.clear();
        self.deferred.clear();
        self.remote.reset();
        tracing::info!(tick = self.tick, dropped, "orientation manager reset");
    }

    // ---------------------------------------------------------------------
    // Tick
    // ---------------------------------------------------------------------

    pub fn tick(&mut self, agent: &dyn Agent) -> TickReport {
        self.tick += 1;
        self.apply_deferred();

        let mut report = TickReport::new(self.tick);
        let natural = agent.rotation().normalize();
        self.committed = natural;
        let settled_look = self.remote.take_unchanged_look();

        let winner = self.arbitrator.active().map(|r| (r.provider, r.value.clone()));

        if self.is_blocked(agent, winner.as_ref().map(|(_, plan)| plan)) {
            report.suppressed = true;
            report.outbound = self.phase.intended();
            log::trace!("tick {} blocked in {:?}", self.tick, self.phase.kind());
        } else {
            match winner {
                Some((provider, plan)) => {
                    self.step_aiming(agent, provider, plan, natural, settled_look, &mut report)
                }
                None => self.step_release(natural, &mut report),
            }
        }

        if let Some(outbound) = report.outbound {
            self.remote.record_dispatch(outbound);
        }

        self.arbitrator.tick();
        report.phase = self.phase.kind();
        report
    }

    fn apply_deferred(&mut self) {
        for DeferredSubmission { plan, priority, provider } in std::mem::take(&mut self.deferred) {
            let outcome = self.submit_aim_plan(plan, priority, provider);
            log::debug!("deferred submission from {} applied: {:?}", provider, outcome);
        }
    }

    fn is_blocked(&self, agent: &dyn Agent, candidate: Option<&AimPlan>) -> bool {
        if agent.rotation_paused() {
            return true;
        }
        // The winner's flag decides; the working plan only while releasing
        let respects_modal = candidate
            .or(self.phase.plan())
            .is_some_and(AimPlan::consider_inventory);
        respects_modal && agent.modal_open()
    }

    fn step_aiming(
        &mut self,
        agent: &dyn Agent,
        provider: ProviderId,
        plan: AimPlan,
        natural: Rotation,
        settled_look: bool,
        report: &mut TickReport,
    ) {
        let (from, previous_entity, continued) = match std::mem::take(&mut self.phase) {
            Phase::Idle => {
                log::debug!("tick {}: idle -> aiming ({})", self.tick, provider);
                (natural, None, None)
            }
            Phase::Releasing(release) => {
                log::debug!("tick {}: releasing -> aiming ({})", self.tick, provider);
                (release.intended, release.plan.target_entity(), None)
            }
            Phase::Aiming(aim) => {
                let entity = aim.plan.target_entity();
                // Same engagement only while provider and tracked entity hold
                let same = aim.provider == provider && entity == plan.target_entity();
                (aim.intended, entity, same.then_some((aim.segment, aim.engaged + 1)))
            }
        };
        let (previous_segment, engaged) = match continued {
            Some((segment, engaged)) => (Some(segment), engaged),
            None => (None, 0),
        };

        self.run_pre_trigger(&plan, provider, from, previous_entity, settled_look);

        let lookahead = agent.simulate_tick(from);
        let stopped = plan.short_stop().is_some_and(|stop| stop.is_active(engaged));
        if !lookahead.rotation_meaningful || stopped {
            report.outbound = Some(from);
            self.phase = Phase::Aiming(Aim {
                provider,
                plan,
                intended: from,
                segment: previous_segment.unwrap_or_default(),
                engaged,
            });
            return;
        }

        let target = plan.resolve_target(&lookahead.eye_position, agent).normalize();
        let aim_at = match plan.fail_focus() {
            Some(focus) if focus.is_active(engaged) => focus.offset_target(target),
            _ => target,
        };

        let strategy = plan.smoothing();
        let mut segment = match previous_segment {
            Some(segment) if segment.continues_to(aim_at) => segment,
            _ => Segment::plan(strategy, from, aim_at),
        };

        let mut next = segment.step(strategy, from, aim_at);
        let gcd = self.config.gcd();
        if let Some(gcd) = gcd {
            next = next.snapped_to(from, gcd);
        }

        let tolerance = gcd.map_or(SNAP_TOLERANCE, |gcd| gcd.max(SNAP_TOLERANCE));
        if next.difference(target) <= tolerance {
            if let Some(action) = plan.reached_action() {
                let mut ctx = HookContext::new(self.tick, provider, next, &mut self.deferred);
                report.reached = action.fire(&mut ctx);
            }
        }

        if plan.change_look() {
            self.committed = next;
            report.look = Some(next);
        }
        report.outbound = Some(next);

        self.phase = Phase::Aiming(Aim { provider, plan, intended: next, segment, engaged });
    }

    fn run_pre_trigger(
        &mut self,
        plan: &AimPlan,
        provider: ProviderId,
        from: Rotation,
        previous_entity: Option<EntityId>,
        settled_look: bool,
    ) {
        let Some(pre_trigger) = plan.pre_trigger() else {
            return;
        };

        let entity = plan.target_entity();
        let target_changed = entity.is_some() && entity != previous_entity;
        let fire = (pre_trigger.on_target_change && target_changed)
            || (pre_trigger.on_settled_look && settled_look);

        if fire {
            log::trace!("tick {}: pre-trigger `{}`", self.tick, pre_trigger.hook.name());
            let mut ctx = HookContext::new(self.tick, provider, from, &mut self.deferred);
            pre_trigger.hook.invoke(&mut ctx);
        }
    }

    fn step_release(&mut self, natural: Rotation, report: &mut TickReport) {
        let (plan, intended, segment, was_releasing) = match std::mem::take(&mut self.phase) {
            Phase::Idle => return,
            Phase::Aiming(aim) => (aim.plan, aim.intended, None, false),
            Phase::Releasing(release) => (release.plan, release.intended, Some(release.segment), true),
        };

        if plan.change_look() || intended.difference(natural) <= plan.reset_threshold() {
            // Keep the yaw the remote last saw so the heading does not snap there
            let handback = Rotation::new(intended.yaw, natural.pitch).normalize();
            self.committed = handback;
            report.look = Some(handback);
            log::debug!("tick {}: control returned at {:?}", self.tick, handback);
            return;
        }

        if !was_releasing {
            log::debug!("tick {}: releasing toward natural heading", self.tick);
        }
        let mut segment = match segment {
            Some(segment) if segment.continues_to(natural) => segment,
            _ => Segment::plan(plan.smoothing(), intended, natural),
        };
        let blended = segment.step(plan.smoothing(), intended, natural);

        report.outbound = Some(blended);
        self.phase = Phase::Releasing(Release { plan, intended: blended, segment });
    }
}
