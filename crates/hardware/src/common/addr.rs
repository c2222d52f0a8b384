//! Address and page/frame number newtypes.
//!
//! A virtual address is 12 bits wide and splits into
//! `VPN1(3) | VPN2(3) | VPN3(3) | Offset(3)`. The top nine bits form the full
//! virtual page number used as the TLB tag and as the reverse-map owner.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::constants::{FIELD_MASK, NUM_FRAMES, OFFSET_BITS, PTE_PFN_MASK, VA_MASK};

/// A 12-bit virtual address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VirtAddr(u16);

/// A physical address, `(pfn << 3) | offset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysAddr(u16);

/// A 9-bit virtual page number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vpn(u16);

/// A physical frame number, 0..128.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pfn(u8);

impl VirtAddr {
    /// Builds a virtual address, discarding bits above bit 11.
    #[inline(always)]
    pub fn new(addr: u16) -> Self {
        Self(addr & VA_MASK)
    }

    /// Builds a virtual address, rejecting values wider than 12 bits.
    pub fn checked(addr: u32) -> Option<Self> {
        u16::try_from(addr)
            .ok()
            .filter(|a| *a <= VA_MASK)
            .map(Self)
    }

    #[inline(always)]
    pub fn val(&self) -> u16 {
        self.0
    }

    /// Full virtual page number (top nine bits).
    #[inline(always)]
    pub fn vpn(&self) -> Vpn {
        Vpn(self.0 >> OFFSET_BITS)
    }

    pub fn page_offset(&self) -> u16 {
        self.0 & FIELD_MASK
    }
}

impl Vpn {
    /// Builds a page number from its low nine bits.
    #[inline(always)]
    pub fn new(vpn: u16) -> Self {
        Self(vpn & (VA_MASK >> OFFSET_BITS))
    }

    #[inline(always)]
    pub fn val(&self) -> u16 {
        self.0
    }

    /// Index into the table at `level` (0 = root, 2 = leaf).
    pub fn index(&self, level: usize) -> usize {
        let shift = OFFSET_BITS * (2 - level as u32);
        ((self.0 >> shift) & FIELD_MASK) as usize
    }

    pub fn vpn1(&self) -> usize {
        self.index(0)
    }

    pub fn vpn2(&self) -> usize {
        self.index(1)
    }

    pub fn vpn3(&self) -> usize {
        self.index(2)
    }

    /// Address of byte `offset` inside this page.
    pub fn with_offset(&self, offset: u16) -> VirtAddr {
        VirtAddr::new((self.0 << OFFSET_BITS) | (offset & FIELD_MASK))
    }
}

impl Pfn {
    /// Builds a frame number. Panics on values outside the frame pool, which
    /// can only come from a corrupted PTE or a caller bug.
    #[inline(always)]
    pub fn new(pfn: u8) -> Self {
        assert!((pfn as usize) < NUM_FRAMES, "frame {pfn} out of range");
        Self(pfn)
    }

    /// Frame number stored in the low seven bits of a PTE byte.
    #[inline(always)]
    pub(crate) fn from_pte_bits(bits: u8) -> Self {
        Self(bits & PTE_PFN_MASK)
    }

    #[inline(always)]
    pub fn val(&self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Frame number for a slot index of the frame table.
    #[inline(always)]
    pub fn from_index(index: usize) -> Self {
        Self::new(index as u8)
    }
}

impl PhysAddr {
    #[inline(always)]
    pub fn new(addr: u16) -> Self {
        Self(addr)
    }

    /// Composes a physical address from a frame and a page offset.
    pub fn compose(pfn: Pfn, offset: u16) -> Self {
        Self(((pfn.val() as u16) << OFFSET_BITS) | (offset & FIELD_MASK))
    }

    #[inline(always)]
    pub fn val(&self) -> u16 {
        self.0
    }

    pub fn pfn(&self) -> Pfn {
        Pfn::new((self.0 >> OFFSET_BITS) as u8)
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:03x}", self.0)
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:03x}", self.0)
    }
}

impl fmt::Display for Vpn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:03x}", self.0)
    }
}

impl fmt::Display for Pfn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x}", self.0)
    }
}
