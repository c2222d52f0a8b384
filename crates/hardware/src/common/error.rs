//! Simulator error types.
//!
//! [`SimError`] is the only error the translation core can raise: both
//! variants mean the frame pool is exhausted and the run cannot continue.
//! [`InvariantViolation`] is produced by the consistency checker and never by
//! the translation path itself.

use thiserror::Error;

use super::addr::{Pfn, Vpn};

/// Fatal resource exhaustion during translation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A full sweep of the frame table found nothing to evict: page tables and
    /// the bitmask frames occupy the whole store.
    #[error("no swappable frame left: {pinned} of {total} frames are pinned page tables or bitmask")]
    NoSwappableFrame { pinned: usize, total: usize },

    /// The frame freed by an eviction was not available to the very next
    /// allocation.
    #[error("allocation for page {owner} failed right after evicting frame {victim}")]
    AllocationAfterEviction { owner: Vpn, victim: Pfn },
}

/// A broken cross-structure invariant between TLB, page table and frame store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("page {vpn} maps to frame {pfn}, which is not allocated")]
    MappedFrameFree { vpn: Vpn, pfn: Pfn },

    #[error("page {vpn} maps to frame {pfn}, which is owned by page {owner}")]
    OwnerMismatch { vpn: Vpn, pfn: Pfn, owner: Vpn },

    #[error("frame {pfn} is mapped by both page {first} and page {second}")]
    SharedFrame { pfn: Pfn, first: Vpn, second: Vpn },

    #[error("data frame {pfn} of page {vpn} is not marked swappable")]
    DataFrameNotSwappable { vpn: Vpn, pfn: Pfn },

    #[error("table frame {pfn} is marked swappable or is not allocated")]
    TableFrameUnpinned { pfn: Pfn },

    #[error("TLB maps page {vpn} to frame {pfn} but the page table has {table:?}")]
    TlbIncoherent { vpn: Vpn, pfn: Pfn, table: Option<Pfn> },

    #[error("TLB holds {count} valid entries for page {vpn}")]
    TlbDuplicate { vpn: Vpn, count: usize },
}
