//! Request Arbitrator - priority register with time-decayed ownership.
//!
//! Producers submit `(provider, priority, ttl, value)`. The highest-priority
//! live request wins; ties go to the most recent submission. Every request
//! loses one tick of TTL per [`Arbitrator::tick`] and is evicted at zero, so a
//! producer keeps control only by re-submitting.
//!
//! ## Tick order
//! 1. `active()` / `active_request()` (read)
//! 2. `tick()` (age)
//!
//! A request submitted with TTL `n` is visible to exactly `n` reads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a producer (combat, movement, interaction module, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ProviderId(pub &'static str);

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Priority ladder shared by producers.
///
/// Declaration order is the comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    NotImportant,
    ImportantForUsage1,
    ImportantForUsage2,
    ImportantForUsage3,
    ImportantForPlayerLife,
    ImportantForUserSafety,
}

impl Priority {
    pub const fn value(self) -> i32 {
        match self {
            Priority::NotImportant => 0,
            Priority::ImportantForUsage1 => 10,
            Priority::ImportantForUsage2 => 20,
            Priority::ImportantForUsage3 => 25,
            Priority::ImportantForPlayerLife => 40,
            Priority::ImportantForUserSafety => 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Request<K, P, T> {
    pub provider: K,
    pub priority: P,
    pub remaining_ticks: u32,
    pub value: T,
    sequence: u64,
}

/// Outcome of [`Arbitrator::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// New entry for this provider
    Accepted,
    /// Replaced the provider's previous live request
    Replaced,
    /// Ignored: another provider holds a strictly higher priority (or TTL was 0)
    Rejected,
}

impl Submission {
    pub fn is_accepted(self) -> bool {
        !matches!(self, Submission::Rejected)
    }
}

#[derive(Debug, Clone)]
pub struct Arbitrator<K, P, T> {
    requests: Vec<Request<K, P, T>>,
    next_sequence: u64,
}

impl<K, P, T> Default for Arbitrator<K, P, T> {
    fn default() -> Self {
        Self { requests: Vec::new(), next_sequence: 0 }
    }
}

impl<K, P, T> Arbitrator<K, P, T>
where
    K: PartialEq,
    P: Ord,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit or renew a request.
    ///
    /// No-op when a live request from a different provider has strictly higher
    /// priority.
    pub fn submit(&mut self, provider: K, priority: P, ttl_ticks: u32, value: T) -> Submission {
        if ttl_ticks == 0 {
            return Submission::Rejected;
        }

        let outranked = self
            .requests
            .iter()
            .any(|r| r.provider != provider && r.priority > priority);
        if outranked {
            return Submission::Rejected;
        }

        let before = self.requests.len();
        self.requests.retain(|r| r.provider != provider);
        let outcome = if self.requests.len() < before {
            Submission::Replaced
        } else {
            Submission::Accepted
        };

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.requests.push(Request {
            provider,
            priority,
            remaining_ticks: ttl_ticks,
            value,
            sequence,
        });

        outcome
    }

    /// Winning request: highest priority, latest submission on ties.
    pub fn active(&self) -> Option<&Request<K, P, T>> {
        self.requests
            .iter()
            .max_by(|a, b| a.priority.cmp(&b.priority).then(a.sequence.cmp(&b.sequence)))
    }

    pub fn active_request(&self) -> Option<&T> {
        self.active().map(|r| &r.value)
    }

    /// Age every request by one tick and evict expired ones.
    pub fn tick(&mut self) {
        for request in &mut self.requests {
            request.remaining_ticks = request.remaining_ticks.saturating_sub(1);
        }
        self.requests.retain(|r| r.remaining_ticks > 0);
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Request<K, P, T>> {
        self.requests.iter()
    }
}
