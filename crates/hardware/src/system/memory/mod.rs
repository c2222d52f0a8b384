//! Physical frame store.
//!
//! One flat byte array backs everything: the swappable bitmask in frames 0-1,
//! the root page table in frame 2, lazily built table nodes and data pages.
//! Frame ownership (allocated flag and reverse map) lives beside the bytes and
//! is the single source of truth the TLB and page table are kept coherent with.

use crate::common::constants::{
    BITMASK_FRAMES, FIRST_FREE_FRAME, MEM_SIZE, NUM_FRAMES, PAGE_SIZE, ROOT_TABLE_FRAME,
};
use crate::common::{Pfn, Vpn};

pub struct FrameStore {
    bytes: Vec<u8>,
    allocated: Vec<bool>,
    owners: Vec<Vpn>,
}

impl FrameStore {
    /// Creates a zeroed store with the bitmask frames and the root table
    /// reserved.
    pub fn new() -> Self {
        let mut store = Self {
            bytes: vec![0; MEM_SIZE],
            allocated: vec![false; NUM_FRAMES],
            owners: vec![Vpn::default(); NUM_FRAMES],
        };

        for frame in 0..BITMASK_FRAMES {
            store.reserve(Pfn::from_index(frame));
        }
        store.reserve(Pfn::new(ROOT_TABLE_FRAME));
        store
    }

    fn reserve(&mut self, pfn: Pfn) {
        self.allocated[pfn.index()] = true;
        self.set_swappable(pfn, false);
    }

    /// Hands out the lowest free frame at or above frame 3.
    ///
    /// The frame is zero-filled and records `owner` in the reverse map.
    /// Returns `None` when every frame is allocated.
    pub fn allocate(&mut self, owner: Vpn, swappable: bool) -> Option<Pfn> {
        let index = (FIRST_FREE_FRAME..NUM_FRAMES).find(|&i| !self.allocated[i])?;
        let pfn = Pfn::from_index(index);

        self.allocated[index] = true;
        self.set_swappable(pfn, swappable);
        self.owners[index] = owner;
        self.frame_mut(pfn).fill(0);
        Some(pfn)
    }

    /// Returns a frame to the pool. Owner, swappable bit and contents are left
    /// stale until the next allocation overwrites them.
    pub fn free(&mut self, pfn: Pfn) {
        self.allocated[pfn.index()] = false;
    }

    /// Page that owns (or last owned) `pfn`.
    pub fn owner_of(&self, pfn: Pfn) -> Vpn {
        self.owners[pfn.index()]
    }

    pub fn is_allocated(&self, pfn: Pfn) -> bool {
        self.allocated[pfn.index()]
    }

    /// Reads the frame's bit in the in-memory bitmask.
    pub fn is_swappable(&self, pfn: Pfn) -> bool {
        let (byte, bit) = bitmask_position(pfn);
        (self.bytes[byte] >> bit) & 1 != 0
    }

    /// Writes the frame's bit in the in-memory bitmask.
    pub fn set_swappable(&mut self, pfn: Pfn, swappable: bool) {
        let (byte, bit) = bitmask_position(pfn);
        if swappable {
            self.bytes[byte] |= 1 << bit;
        } else {
            self.bytes[byte] &= !(1 << bit);
        }
    }

    /// Allocated frames that hold data pages and may be evicted.
    pub fn is_evictable(&self, pfn: Pfn) -> bool {
        self.is_allocated(pfn) && self.is_swappable(pfn)
    }

    pub fn read_u8(&self, pfn: Pfn, offset: usize) -> u8 {
        self.bytes[byte_address(pfn, offset)]
    }

    pub fn write_u8(&mut self, pfn: Pfn, offset: usize, val: u8) {
        self.bytes[byte_address(pfn, offset)] = val;
    }

    /// The frame's 8-byte window.
    pub fn frame(&self, pfn: Pfn) -> &[u8] {
        let base = pfn.index() * PAGE_SIZE;
        &self.bytes[base..base + PAGE_SIZE]
    }

    fn frame_mut(&mut self, pfn: Pfn) -> &mut [u8] {
        let base = pfn.index() * PAGE_SIZE;
        &mut self.bytes[base..base + PAGE_SIZE]
    }

    pub fn allocated_count(&self) -> usize {
        self.allocated.iter().filter(|a| **a).count()
    }

    /// Allocated frames that can never be evicted (bitmask, root and tables).
    pub fn pinned_count(&self) -> usize {
        self.frames().filter(|&p| self.is_allocated(p) && !self.is_swappable(p)).count()
    }

    /// Iterates over every frame number in index order.
    pub fn frames(&self) -> impl Iterator<Item = Pfn> + use<> {
        (0..NUM_FRAMES).map(Pfn::from_index)
    }
}

impl Default for FrameStore {
    fn default() -> Self {
        Self::new()
    }
}

#[inline(always)]
fn bitmask_position(pfn: Pfn) -> (usize, usize) {
    (pfn.index() / 8, pfn.index() % 8)
}

#[inline(always)]
fn byte_address(pfn: Pfn, offset: usize) -> usize {
    debug_assert!(offset < PAGE_SIZE);
    pfn.index() * PAGE_SIZE + offset
}
