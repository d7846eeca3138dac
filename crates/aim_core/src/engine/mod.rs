pub mod agent; // Agent collaborator seam + latency flag
pub mod aim_plan;
pub mod arbitrator; // Priority + TTL request register
pub mod config;
pub mod focus; // Short stop / fail focus cadence
pub mod hooks; // Pre-trigger / reached callbacks
pub mod orientation; // Idle / Aiming / Releasing driver
pub mod remote; // Acknowledged vs theoretical remote rotation
pub mod rotation;
pub mod smoothing;
pub mod velocity;

pub use agent::{Agent, LatencySignal, Lookahead, NoInducedDelay};
pub use aim_plan::{AimPlan, AimTarget, EntityId};
pub use arbitrator::{Arbitrator, Priority, ProviderId, Request, Submission};
pub use config::{AimConfig, ManagerConfig, RotationsConfig};
pub use focus::{Cadence, FailFocus, ShortStop};
pub use hooks::{Hook, HookContext, PreTrigger, SingleUseAction};
pub use orientation::{OrientationManager, PhaseKind, TickReport};
pub use remote::{RemoteRotation, RemoteSnapshot};
pub use rotation::{Angle, Rotation};
pub use smoothing::{AngleSmooth, SmoothingStrategy};
