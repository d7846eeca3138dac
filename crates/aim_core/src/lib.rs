//! # aim_core - Deterministic Orientation Arbitration Engine
//!
//! Many producers (combat, movement, interaction logic) compete for one
//! shared orientation. This crate decides who wins each tick and moves the
//! orientation toward the winner's target with a pluggable smoothing
//! strategy, while tracking what a remote peer has actually seen.
//!
//! ## Features
//! - Priority + TTL arbitration (control expires unless renewed)
//! - Linear, Bezier, Sigmoid, conditional and accelerating smoothing
//! - Graceful hand-back to the agent's natural heading
//! - Acknowledged vs theoretical remote rotation under induced latency
//!
//! ```rust
//! use aim_core::engine::smoothing::LinearSmoothing;
//! use aim_core::{AimPlan, OrientationManager, Priority, ProviderId, Rotation, SmoothingStrategy};
//!
//! let mut manager = OrientationManager::default();
//! let plan = AimPlan::new(
//!     Rotation::new(90.0, 0.0),
//!     SmoothingStrategy::Linear(LinearSmoothing { step: 10.0 }),
//! );
//! assert!(manager.submit_aim_plan(plan, Priority::ImportantForUsage1, ProviderId("demo")).is_accepted());
//! ```

// Tick helpers thread agent, plan and report state through one call
#![allow(clippy::too_many_arguments)]

pub mod engine;
pub mod error;

pub use engine::{
    Agent, AimConfig, AimPlan, AimTarget, EntityId, Hook, OrientationManager, Priority,
    ProviderId, RemoteRotation, Rotation, SmoothingStrategy, TickReport,
};
pub use error::{AimError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
