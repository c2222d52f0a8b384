//! Replacement policies shared by the TLB and the swap engine.
//!
//! Both caches pick victims through the same trait so the process-wide
//! [`Policy`] selector applies to them identically. A policy only tracks slot
//! indices; the owning structure decides which slots are eligible.

use crate::config::Policy;

pub use self::lru::LruPolicy;
pub use self::rr::RoundRobinPolicy;

mod lru;
mod rr;

pub trait ReplacementPolicy {
    /// Records a use of `slot` at simulation time `now`.
    fn touch(&mut self, slot: usize, now: u64);

    /// Chooses a victim among the slots for which `eligible` holds, or `None`
    /// when no slot qualifies.
    fn victim(&mut self, eligible: &dyn Fn(usize) -> bool) -> Option<usize>;
}

/// Builds the policy selected by `policy` for a structure with `slots` entries.
pub fn build(policy: Policy, slots: usize) -> Box<dyn ReplacementPolicy> {
    match policy {
        Policy::Rr => Box::new(RoundRobinPolicy::new(slots)),
        Policy::Lru => Box::new(LruPolicy::new(slots)),
    }
}
