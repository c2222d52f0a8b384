//! Collaborators around the translation core: trace I/O, event sinks and
//! workload generation, plus the driver loop that ties them together.

pub mod event_log;
pub mod events;
pub mod loader;
pub mod workload;

use self::events::EventSink;
use self::loader::Trace;
use crate::common::{PhysAddr, SimError};
use crate::core::Mmu;

/// Translates every address of `trace` in order and returns the physical
/// addresses produced. Stops at the first fatal error.
pub fn run_trace(
    mmu: &mut Mmu,
    trace: &Trace,
    sink: &mut dyn EventSink,
) -> Result<Vec<PhysAddr>, SimError> {
    trace
        .addresses
        .iter()
        .map(|&va| mmu.translate(va, sink))
        .collect()
}
