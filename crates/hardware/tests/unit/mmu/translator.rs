use pagesim::sim::events::Event;
use pagesim::{Mmu, Policy, SimError};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::{lru, pa, page_addr, pfn, pin_remaining_frames, rr, touch_pages, translate, va, vpn};

#[test]
fn test_first_access_faults_then_hits() {
    let mut mmu = rr();
    let (addr, events) = translate(&mut mmu, va(0x000));

    assert_eq!(addr, pa(0x018));
    assert_eq!(
        events,
        vec![
            Event::VaAccess { va: va(0x000) },
            Event::TlbMiss { vpn: vpn(0) },
            Event::PtMiss { vpn: vpn(0) },
            Event::PtUpdate { vpn: vpn(0), pfn: pfn(3) },
            Event::TlbUpdate { vpn: vpn(0), pfn: pfn(3) },
            Event::VaAccess { va: va(0x000) },
            Event::TlbHit { vpn: vpn(0), pfn: pfn(3) },
            Event::PaResult { pa: pa(0x018) },
        ]
    );
}

#[rstest]
#[case(Policy::Rr)]
#[case(Policy::Lru)]
fn test_repeat_access_hits_tlb(#[case] policy: Policy) {
    let mut mmu = Mmu::with_policy(policy);
    let (first, _) = translate(&mut mmu, va(0x2f5));
    let (second, events) = translate(&mut mmu, va(0x2f5));

    assert_eq!(first, second);
    assert_eq!(
        events,
        vec![
            Event::VaAccess { va: va(0x2f5) },
            Event::TlbHit { vpn: vpn(0x5e), pfn: first.pfn() },
            Event::PaResult { pa: first },
        ]
    );
}

#[test]
fn test_offset_is_carried_through() {
    let mut mmu = rr();
    let (addr, _) = translate(&mut mmu, va(0x007));
    assert_eq!(addr, pa(0x01f));

    let (addr, _) = translate(&mut mmu, va(0x003));
    assert_eq!(addr, pa(0x01b));
}

#[test]
fn test_page_table_hit_refills_tlb() {
    let mut mmu = rr();
    // Seventeen pages push page 0 out of the TLB but not out of memory.
    touch_pages(&mut mmu, 0..17);

    let (addr, events) = translate(&mut mmu, page_addr(0));

    assert_eq!(addr, pa(0x018));
    assert_eq!(
        events,
        vec![
            Event::VaAccess { va: va(0) },
            Event::TlbMiss { vpn: vpn(0) },
            Event::PtHit { vpn: vpn(0), pfn: pfn(3) },
            Event::TlbUpdate { vpn: vpn(0), pfn: pfn(3) },
            Event::VaAccess { va: va(0) },
            Event::TlbHit { vpn: vpn(0), pfn: pfn(3) },
            Event::PaResult { pa: pa(0x018) },
        ]
    );
}

#[test]
fn test_clock_advances_once_per_address() {
    let mut mmu = lru();
    assert_eq!(mmu.now(), 0);

    translate(&mut mmu, va(0x100));
    assert_eq!(mmu.now(), 1);
    translate(&mut mmu, va(0x100));
    translate(&mut mmu, va(0x508));
    assert_eq!(mmu.now(), 3);
}

#[test]
fn test_stats_count_accesses_not_rounds() {
    let mut mmu = rr();
    touch_pages(&mut mmu, [0, 1, 0, 0]);

    let stats = mmu.stats();
    assert_eq!(stats.accesses, 4);
    assert_eq!(stats.tlb_hits, 2);
    assert_eq!(stats.tlb_misses, 2);
    assert_eq!(stats.page_faults, 2);
    assert_eq!(stats.pt_hits, 0);
    assert_eq!(stats.evictions, 0);
    // Root, one level-2 table and one leaf.
    assert_eq!(stats.table_frames, 3);
    assert_eq!(stats.tlb_miss_rate(), 50.0);
}

#[test]
fn test_fault_under_full_memory_evicts_round_robin_victim() {
    let mut mmu = rr();
    touch_pages(&mut mmu, [0, 1]);
    pin_remaining_frames(&mut mmu);

    // Page 2 shares the leaf table with pages 0 and 1.
    let (addr, events) = translate(&mut mmu, page_addr(2));

    assert_eq!(addr, pa(0x018));
    assert!(events.contains(&Event::PtUpdate { vpn: vpn(2), pfn: pfn(3) }));
    assert_eq!(mmu.page_table.lookup(&mmu.frames, vpn(0)), None);
    assert_eq!(mmu.stats().evictions, 1);
    mmu.check_invariants().unwrap();
}

#[test]
fn test_new_frame_is_not_evicted_while_its_tables_are_built() {
    let mut mmu = lru();
    // Data: page 0 -> 3, page 1 -> 6, page 2 -> 7; tables in 4 and 5.
    touch_pages(&mut mmu, [0, 1, 2]);
    pin_remaining_frames(&mut mmu);

    // Page 0x40 needs a new level-2 table and leaf. Frame 3 is recycled for
    // its data, then frames 6 and 7 are taken for the tables.
    let (addr, _) = translate(&mut mmu, page_addr(0x40));

    assert_eq!(addr, pa(0x018));
    assert_eq!(mmu.page_table.lookup(&mmu.frames, vpn(0x40)), Some(pfn(3)));
    for page in [0, 1, 2] {
        assert_eq!(mmu.page_table.lookup(&mmu.frames, vpn(page)), None);
    }
    assert!(!mmu.frames.is_swappable(pfn(6)));
    assert!(!mmu.frames.is_swappable(pfn(7)));
    assert!(mmu.frames.is_swappable(pfn(3)));
    mmu.check_invariants().unwrap();
}

#[test]
fn test_table_growth_can_exhaust_frames() {
    let mut mmu = rr();
    touch_pages(&mut mmu, [0]);
    pin_remaining_frames(&mut mmu);

    // The only data frame is recycled for page 0x40; its tables then have
    // nothing left to evict.
    let mut events = Vec::new();
    let err = mmu.translate(page_addr(0x40), &mut events).unwrap_err();

    assert!(matches!(err, SimError::NoSwappableFrame { .. }));
    assert!(!events.iter().any(|e| matches!(e, Event::PaResult { .. })));
}
