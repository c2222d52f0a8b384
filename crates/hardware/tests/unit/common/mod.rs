//! Test helpers shared by the unit and integration suites.

#![allow(dead_code)]

use pagesim::common::constants::NUM_FRAMES;
use pagesim::sim::events::Event;
use pagesim::{Mmu, Pfn, PhysAddr, Policy, VirtAddr, Vpn};

/// Routes `log` output through the test harness; `RUST_LOG` still filters.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn va(raw: u16) -> VirtAddr {
    VirtAddr::new(raw)
}

pub fn vpn(raw: u16) -> Vpn {
    Vpn::new(raw)
}

pub fn pfn(raw: u8) -> Pfn {
    Pfn::new(raw)
}

pub fn pa(raw: u16) -> PhysAddr {
    PhysAddr::new(raw)
}

/// First address of page `page`.
pub fn page_addr(page: u16) -> VirtAddr {
    vpn(page).with_offset(0)
}

/// Translates one address and returns the result with its event sequence.
pub fn translate(mmu: &mut Mmu, addr: VirtAddr) -> (PhysAddr, Vec<Event>) {
    let mut events = Vec::new();
    let pa = mmu
        .translate(addr, &mut events)
        .expect("translation should not exhaust frames");
    (pa, events)
}

/// Translates each page in `pages` at offset 0 and discards the events.
pub fn touch_pages(mmu: &mut Mmu, pages: impl IntoIterator<Item = u16>) {
    for page in pages {
        translate(mmu, page_addr(page));
    }
}

/// Fills every remaining frame with pinned filler so that nothing new can be
/// allocated without an eviction.
pub fn pin_remaining_frames(mmu: &mut Mmu) {
    while mmu.frames.allocate(vpn(0x1ff), false).is_some() {}
    assert_eq!(mmu.frames.allocated_count(), NUM_FRAMES);
}

pub fn rr() -> Mmu {
    Mmu::with_policy(Policy::Rr)
}

pub fn lru() -> Mmu {
    Mmu::with_policy(Policy::Lru)
}
