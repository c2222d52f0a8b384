//! Translation events and the sink trait the core reports them to.

use std::fmt;

use serde::Serialize;

use crate::common::{PhysAddr, Pfn, VirtAddr, Vpn};

/// One observable step of a translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A TLB lookup round for `va` begins.
    VaAccess { va: VirtAddr },
    TlbHit { vpn: Vpn, pfn: Pfn },
    TlbMiss { vpn: Vpn },
    TlbUpdate { vpn: Vpn, pfn: Pfn },
    PtHit { vpn: Vpn, pfn: Pfn },
    PtMiss { vpn: Vpn },
    PtUpdate { vpn: Vpn, pfn: Pfn },
    /// The translation finished with `pa`.
    PaResult { pa: PhysAddr },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::VaAccess { va } => write!(f, "Access VA: {va}"),
            Event::TlbHit { vpn, pfn } => write!(f, "TLB Hit: VPN {vpn} -> PFN {pfn}"),
            Event::TlbMiss { vpn } => write!(f, "TLB Miss: VPN {vpn}"),
            Event::TlbUpdate { vpn, pfn } => write!(f, "TLB Update: VPN {vpn} -> PFN {pfn}"),
            Event::PtHit { vpn, pfn } => write!(f, "Page Table Hit: VPN {vpn} -> PFN {pfn}"),
            Event::PtMiss { vpn } => write!(f, "Page Table Miss: VPN {vpn}"),
            Event::PtUpdate { vpn, pfn } => {
                write!(f, "Page Table Update: VPN {vpn} -> PFN {pfn}")
            }
            Event::PaResult { pa } => write!(f, "PA: {pa}"),
        }
    }
}

/// Receives events in the order the translator produces them. Sinks cannot
/// influence translation.
pub trait EventSink {
    fn record(&mut self, event: Event);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: Event) {}
}

impl EventSink for Vec<Event> {
    fn record(&mut self, event: Event) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn record(&mut self, event: Event) {
        (**self).record(event);
    }
}
