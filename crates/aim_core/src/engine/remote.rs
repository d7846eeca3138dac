//! What the remote peer believes our rotation is.
//!
//! Two models are kept side by side:
//! - **acknowledged**: last rotation the transport confirmed
//! - **theoretical**: last rotation handed to the transport, confirmed or not
//!
//! While outbound traffic is artificially withheld (fake lag, backtrack, ...)
//! the two diverge; logic that reasons about what the remote *will* believe
//! reads the theoretical value.
//!
//! The transport may call in from another thread, so the state lives behind a
//! mutex and every read takes one consistent snapshot.

use super::rotation::Rotation;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RemoteSnapshot {
    pub acknowledged: Rotation,
    pub theoretical: Rotation,
}

impl RemoteSnapshot {
    pub fn believed(&self, induced_delay: bool) -> Rotation {
        if induced_delay {
            self.theoretical
        } else {
            self.acknowledged
        }
    }
}

#[derive(Debug, Default)]
struct RemoteState {
    snapshot: RemoteSnapshot,
    look_unchanged: bool,
}

/// Cloneable handle; clones share state.
#[derive(Debug, Clone, Default)]
pub struct RemoteRotation {
    inner: Arc<Mutex<RemoteState>>,
}

impl RemoteRotation {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RemoteState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A rotation was handed to the transport (sent or queued).
    pub fn record_dispatch(&self, rotation: Rotation) {
        self.lock().snapshot.theoretical = rotation.normalize();
    }

    /// The transport confirmed the remote now has `rotation`.
    pub fn acknowledge(&self, rotation: Rotation) {
        self.lock().snapshot.acknowledged = rotation.normalize();
    }

    /// An outbound movement message went out without a look change.
    pub fn record_unchanged_look(&self) {
        self.lock().look_unchanged = true;
    }

    pub fn snapshot(&self) -> RemoteSnapshot {
        self.lock().snapshot
    }

    pub fn believed(&self, induced_delay: bool) -> Rotation {
        self.snapshot().believed(induced_delay)
    }

    /// Read and clear the unchanged-look marker.
    pub(crate) fn take_unchanged_look(&self) -> bool {
        std::mem::take(&mut self.lock().look_unchanged)
    }

    pub fn reset(&self) {
        *self.lock() = RemoteState::default();
    }
}
