//! Event order as delivered to a sink, checked call by call.

use mockall::predicate::eq;
use mockall::{Sequence, mock};
use pagesim::sim::events::{Event, EventSink};
use pagesim::{Mmu, Policy};

use crate::common::{pa, pfn, touch_pages, va, vpn};

mock! {
    pub Sink {}

    impl EventSink for Sink {
        fn record(&mut self, event: Event);
    }
}

fn expect_in_order(sink: &mut MockSink, events: Vec<Event>) {
    let mut seq = Sequence::new();
    for event in events {
        sink.expect_record()
            .with(eq(event))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
    }
}

#[test]
fn test_fault_path_order() {
    let mut mmu = Mmu::with_policy(Policy::Rr);
    let mut sink = MockSink::new();
    expect_in_order(
        &mut sink,
        vec![
            Event::VaAccess { va: va(0x00c) },
            Event::TlbMiss { vpn: vpn(1) },
            Event::PtMiss { vpn: vpn(1) },
            Event::PtUpdate { vpn: vpn(1), pfn: pfn(3) },
            Event::TlbUpdate { vpn: vpn(1), pfn: pfn(3) },
            Event::VaAccess { va: va(0x00c) },
            Event::TlbHit { vpn: vpn(1), pfn: pfn(3) },
            Event::PaResult { pa: pa(0x01c) },
        ],
    );

    assert_eq!(mmu.translate(va(0x00c), &mut sink).unwrap(), pa(0x01c));
}

#[test]
fn test_page_table_hit_path_order() {
    let mut mmu = Mmu::with_policy(Policy::Lru);
    // Page 0 in frame 3, then sixteen more pages push it out of the TLB.
    touch_pages(&mut mmu, 0..17);

    let mut sink = MockSink::new();
    expect_in_order(
        &mut sink,
        vec![
            Event::VaAccess { va: va(0x001) },
            Event::TlbMiss { vpn: vpn(0) },
            Event::PtHit { vpn: vpn(0), pfn: pfn(3) },
            Event::TlbUpdate { vpn: vpn(0), pfn: pfn(3) },
            Event::VaAccess { va: va(0x001) },
            Event::TlbHit { vpn: vpn(0), pfn: pfn(3) },
            Event::PaResult { pa: pa(0x019) },
        ],
    );

    assert_eq!(mmu.translate(va(0x001), &mut sink).unwrap(), pa(0x019));
}

#[test]
fn test_hit_path_emits_three_events() {
    let mut mmu = Mmu::with_policy(Policy::Rr);
    touch_pages(&mut mmu, [0x1ff]);

    let mut sink = MockSink::new();
    sink.expect_record().times(3).return_const(());
    mmu.translate(va(0xfff), &mut sink).unwrap();
}
