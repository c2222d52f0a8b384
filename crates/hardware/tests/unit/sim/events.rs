use pagesim::sim::events::{Event, EventSink, NullSink};
use rstest::rstest;

use crate::common::{pa, pfn, va, vpn};

#[rstest]
#[case(Event::VaAccess { va: va(0x1f8) }, "Access VA: 0x1f8")]
#[case(Event::TlbHit { vpn: vpn(0x3f), pfn: pfn(3) }, "TLB Hit: VPN 0x03f -> PFN 0x03")]
#[case(Event::TlbMiss { vpn: vpn(0) }, "TLB Miss: VPN 0x000")]
#[case(Event::TlbUpdate { vpn: vpn(0x1ff), pfn: pfn(0x7f) }, "TLB Update: VPN 0x1ff -> PFN 0x7f")]
#[case(Event::PtHit { vpn: vpn(8), pfn: pfn(12) }, "Page Table Hit: VPN 0x008 -> PFN 0x0c")]
#[case(Event::PtMiss { vpn: vpn(8) }, "Page Table Miss: VPN 0x008")]
#[case(Event::PtUpdate { vpn: vpn(8), pfn: pfn(12) }, "Page Table Update: VPN 0x008 -> PFN 0x0c")]
#[case(Event::PaResult { pa: pa(0x01f) }, "PA: 0x01f")]
fn test_event_text(#[case] event: Event, #[case] expected: &str) {
    assert_eq!(event.to_string(), expected);
}

#[test]
fn test_event_json_is_tagged() {
    let json = serde_json::to_value(Event::TlbHit { vpn: vpn(2), pfn: pfn(9) }).unwrap();
    assert_eq!(json, serde_json::json!({ "event": "tlb_hit", "vpn": 2, "pfn": 9 }));

    let json = serde_json::to_value(Event::PaResult { pa: pa(0x48) }).unwrap();
    assert_eq!(json, serde_json::json!({ "event": "pa_result", "pa": 72 }));
}

fn feed<S: EventSink>(mut sink: S, event: Event) {
    sink.record(event);
}

#[test]
fn test_sink_through_mutable_reference() {
    let mut events: Vec<Event> = Vec::new();
    feed(&mut events, Event::TlbMiss { vpn: vpn(1) });
    feed(NullSink, Event::TlbMiss { vpn: vpn(2) });

    assert_eq!(events, vec![Event::TlbMiss { vpn: vpn(1) }]);
}
