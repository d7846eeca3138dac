//! Producer-supplied hooks.
//!
//! Hooks are plain function handles invoked synchronously from the tick loop.
//! They cannot touch the arbitrator directly: plans submitted through
//! [`HookContext::submit`] are queued and applied at the start of the next tick.
//! A failing hook is logged and otherwise ignored.

use super::aim_plan::AimPlan;
use super::arbitrator::{Priority, ProviderId};
use super::rotation::Rotation;
use crate::error::AimError;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Submission issued from inside a hook, applied next tick.
#[derive(Debug, Clone)]
pub(crate) struct DeferredSubmission {
    pub plan: AimPlan,
    pub priority: Priority,
    pub provider: ProviderId,
}

/// What a hook can see and do while it runs.
pub struct HookContext<'a> {
    tick: u64,
    provider: ProviderId,
    rotation: Rotation,
    deferred: &'a mut Vec<DeferredSubmission>,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(
        tick: u64,
        provider: ProviderId,
        rotation: Rotation,
        deferred: &'a mut Vec<DeferredSubmission>,
    ) -> Self {
        Self { tick, provider, rotation, deferred }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Provider owning the plan this hook belongs to.
    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    /// Intended rotation when the hook fired.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Queue a submission for the next tick.
    pub fn submit(&mut self, plan: AimPlan, priority: Priority, provider: ProviderId) {
        self.deferred.push(DeferredSubmission { plan, priority, provider });
    }
}

type HookFn = dyn Fn(&mut HookContext<'_>) -> anyhow::Result<()> + Send + Sync;

#[derive(Clone)]
pub struct Hook {
    name: &'static str,
    action: Arc<HookFn>,
}

impl Hook {
    pub fn new<F>(name: &'static str, action: F) -> Self
    where
        F: Fn(&mut HookContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self { name, action: Arc::new(action) }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn run(&self, ctx: &mut HookContext<'_>) -> Result<(), AimError> {
        (self.action)(ctx).map_err(|source| AimError::Hook { hook: self.name, source })
    }

    /// Best effort: errors are logged, never propagated.
    pub(crate) fn invoke(&self, ctx: &mut HookContext<'_>) -> bool {
        match self.run(ctx) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(hook = self.name, tick = ctx.tick(), error = %err, "aim hook failed");
                false
            }
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Hook").field(&self.name).finish()
    }
}

/// Hook that fires at most once, shared by every clone of its plan.
#[derive(Debug, Clone)]
pub struct SingleUseAction {
    hook: Hook,
    used: Arc<AtomicBool>,
}

impl SingleUseAction {
    pub fn new(hook: Hook) -> Self {
        Self { hook, used: Arc::new(AtomicBool::new(false)) }
    }

    pub fn is_used(&self) -> bool {
        self.used.load(Ordering::Acquire)
    }

    /// Returns `false` if it already fired.
    pub(crate) fn fire(&self, ctx: &mut HookContext<'_>) -> bool {
        if self.used.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.hook.invoke(ctx);
        true
    }
}

/// Hook run before a step when the plan's target changes or the look settled.
#[derive(Debug, Clone)]
pub struct PreTrigger {
    pub hook: Hook,
    /// Fire when the tracked entity differs from the previous plan's
    pub on_target_change: bool,
    /// Fire when the last outbound message carried no look change
    pub on_settled_look: bool,
}

impl PreTrigger {
    pub fn new(hook: Hook) -> Self {
        Self { hook, on_target_change: true, on_settled_look: false }
    }

    pub fn on_settled_look(mut self, enabled: bool) -> Self {
        self.on_settled_look = enabled;
        self
    }

    pub fn on_target_change(mut self, enabled: bool) -> Self {
        self.on_target_change = enabled;
        self
    }
}
