//! Swap-out engine.
//!
//! Runs only when the frame store is full. The victim is always a swappable
//! data frame; its page is unmapped from the TLB and the page table before the
//! frame is freed, in that order, so no cache ever names a free frame.

use super::page_table::PageTable;
use super::tlb::Tlb;
use crate::common::constants::NUM_FRAMES;
use crate::common::{Pfn, SimError, Vpn};
use crate::config::Policy;
use crate::core::policy::{self, ReplacementPolicy};
use crate::system::FrameStore;

pub struct Swapper {
    policy: Box<dyn ReplacementPolicy>,
    evictions: u64,
}

/// What one swap-out did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Eviction {
    pub victim: Pfn,
    pub owner: Vpn,
    pub tlb_entries: usize,
    pub pte_cleared: bool,
}

impl Swapper {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy: policy::build(policy, NUM_FRAMES),
            evictions: 0,
        }
    }

    /// Marks `pfn` as used at `now`. Called when a TLB hit resolves to it.
    pub fn touch(&mut self, pfn: Pfn, now: u64) {
        self.policy.touch(pfn.index(), now);
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Picks the next victim among evictable frames without touching any
    /// mapping.
    pub fn select_victim(&mut self, frames: &FrameStore) -> Result<Pfn, SimError> {
        self.policy
            .victim(&|slot| frames.is_evictable(Pfn::from_index(slot)))
            .map(Pfn::from_index)
            .ok_or_else(|| SimError::NoSwappableFrame {
                pinned: frames.pinned_count(),
                total: NUM_FRAMES,
            })
    }

    /// Evicts one data page and frees its frame. The caller allocates again.
    pub fn swap_out(
        &mut self,
        frames: &mut FrameStore,
        tlb: &mut Tlb,
        page_table: &PageTable,
    ) -> Result<Eviction, SimError> {
        let victim = self.select_victim(frames)?;
        let owner = frames.owner_of(victim);

        let tlb_entries = tlb.invalidate(owner);
        let pte_cleared = page_table.invalidate(frames, owner);
        frames.free(victim);
        self.evictions += 1;

        log::debug!("swap: evicted page {owner} from frame {victim}");
        Ok(Eviction {
            victim,
            owner,
            tlb_entries,
            pte_cleared,
        })
    }
}

/// Allocates a frame for `owner`, swapping a page out first if the store is
/// full.
pub fn allocate_frame(
    frames: &mut FrameStore,
    tlb: &mut Tlb,
    swap: &mut Swapper,
    page_table: &PageTable,
    owner: Vpn,
    swappable: bool,
) -> Result<Pfn, SimError> {
    if let Some(pfn) = frames.allocate(owner, swappable) {
        return Ok(pfn);
    }

    let eviction = swap.swap_out(frames, tlb, page_table)?;
    frames
        .allocate(owner, swappable)
        .ok_or(SimError::AllocationAfterEviction {
            owner,
            victim: eviction.victim,
        })
}
