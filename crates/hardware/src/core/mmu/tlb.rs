//! Translation Lookaside Buffer.
//!
//! Fully associative map from VPN to PFN. Free slots are always filled first;
//! once every slot is valid the configured [`ReplacementPolicy`] names the
//! victim. At most one valid entry exists per VPN.

use crate::common::{Pfn, Vpn};
use crate::config::Policy;
use crate::core::policy::{self, ReplacementPolicy};

#[derive(Clone, Copy, Debug, Default)]
struct TlbEntry {
    vpn: Vpn,
    pfn: Pfn,
    valid: bool,
}

pub struct Tlb {
    entries: Vec<TlbEntry>,
    policy: Box<dyn ReplacementPolicy>,
}

impl Tlb {
    pub fn new(size: usize, policy: Policy) -> Self {
        Self {
            entries: vec![TlbEntry::default(); size],
            policy: policy::build(policy, size),
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    fn slot_of(&self, vpn: Vpn) -> Option<usize> {
        self.entries.iter().position(|e| e.valid && e.vpn == vpn)
    }

    /// Looks up `vpn`, refreshing the entry's recency on a hit.
    pub fn lookup(&mut self, vpn: Vpn, now: u64) -> Option<Pfn> {
        let slot = self.slot_of(vpn)?;
        self.policy.touch(slot, now);
        Some(self.entries[slot].pfn)
    }

    /// Installs `vpn -> pfn` and returns the slot written together with the
    /// page it displaced, if any.
    pub fn insert(&mut self, vpn: Vpn, pfn: Pfn, now: u64) -> (usize, Option<Vpn>) {
        let (slot, displaced) = if let Some(slot) = self.slot_of(vpn) {
            (slot, None)
        } else if let Some(slot) = self.entries.iter().position(|e| !e.valid) {
            (slot, None)
        } else {
            // Every slot is valid, so every slot is a candidate.
            let slot = self.policy.victim(&|_| true).unwrap_or(0);
            (slot, Some(self.entries[slot].vpn))
        };

        self.entries[slot] = TlbEntry {
            vpn,
            pfn,
            valid: true,
        };
        self.policy.touch(slot, now);
        (slot, displaced)
    }

    /// Drops every valid entry for `vpn`. Returns how many were dropped.
    pub fn invalidate(&mut self, vpn: Vpn) -> usize {
        let mut dropped = 0;
        for entry in self.entries.iter_mut().filter(|e| e.valid && e.vpn == vpn) {
            entry.valid = false;
            dropped += 1;
        }
        dropped
    }

    pub fn flush(&mut self) {
        for e in &mut self.entries {
            e.valid = false;
        }
    }

    /// Valid entries as `(slot, vpn, pfn)`.
    pub fn entries(&self) -> impl Iterator<Item = (usize, Vpn, Pfn)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.valid)
            .map(|(slot, e)| (slot, e.vpn, e.pfn))
    }

    /// Page held by `slot`, if the slot is valid.
    pub fn page_at(&self, slot: usize) -> Option<Vpn> {
        self.entries.get(slot).filter(|e| e.valid).map(|e| e.vpn)
    }
}
