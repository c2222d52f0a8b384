//! Memory management unit: the simulation context and translator.
//!
//! [`Mmu`] owns every piece of mutable state (frame store, page table, TLB,
//! swap engine, clock) and drives one address at a time through the state
//! machine
//!
//! ```text
//! TlbLookup --hit--> done
//!     |miss
//! PtLookup --hit--> TlbInsert --> TlbLookup
//!     |miss
//! PageFault (allocate, swap if full, install PTE) --> TlbInsert --> TlbLookup
//! ```
//!
//! A translation only ever completes from a TLB hit, so a freshly installed
//! mapping is always confirmed through the TLB before it is reported.

use std::collections::{BTreeMap, HashMap};

use self::page_table::PageTable;
use self::swap::{Swapper, allocate_frame};
use self::tlb::Tlb;
use crate::common::constants::{BITMASK_FRAMES, NUM_FRAMES, TLB_SIZE};
use crate::common::{InvariantViolation, PhysAddr, Pfn, SimError, VirtAddr, Vpn};
use crate::config::{Config, Policy};
use crate::sim::events::{Event, EventSink};
use crate::stats::SimStats;
use crate::system::FrameStore;

pub mod page_table;
pub mod pte;
pub mod swap;
pub mod tlb;

/// Upper bound on lookup rounds per address: a fault costs one failed round
/// and the retry hits.
const MAX_ROUNDS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    TlbLookup,
    PtLookup,
    PageFault,
    TlbInsert(Pfn),
}

pub struct Mmu {
    pub frames: FrameStore,
    pub page_table: PageTable,
    pub tlb: Tlb,
    pub swap: Swapper,
    policy: Policy,
    clock: u64,
    trace: bool,
    stats: SimStats,
}

impl Mmu {
    pub fn new(config: &Config) -> Self {
        let policy = config.memory.policy;
        Self {
            frames: FrameStore::new(),
            page_table: PageTable::new(),
            tlb: Tlb::new(TLB_SIZE, policy),
            swap: Swapper::new(policy),
            policy,
            clock: 0,
            trace: config.trace_enabled(),
            stats: SimStats::default(),
        }
    }

    pub fn with_policy(policy: Policy) -> Self {
        Self::new(&Config::with_policy(policy))
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Simulation time: the number of addresses translated so far.
    pub fn now(&self) -> u64 {
        self.clock
    }

    /// Snapshot of the run counters.
    pub fn stats(&self) -> SimStats {
        let mut stats = self.stats.clone();
        stats.evictions = self.swap.evictions();
        stats.table_frames = self.frames.pinned_count().saturating_sub(BITMASK_FRAMES) as u64;
        stats
    }

    fn emit(&self, sink: &mut dyn EventSink, event: Event) {
        if self.trace {
            log::trace!("[t={}] {event}", self.clock);
        }
        sink.record(event);
    }

    /// Translates one virtual address, resolving TLB misses and page faults
    /// on the way. Advances simulation time by one.
    pub fn translate(&mut self, va: VirtAddr, sink: &mut dyn EventSink) -> Result<PhysAddr, SimError> {
        self.clock += 1;
        self.stats.accesses += 1;
        let now = self.clock;
        let vpn = va.vpn();

        let mut rounds = 0;
        let mut step = Step::TlbLookup;
        loop {
            step = match step {
                Step::TlbLookup => {
                    rounds += 1;
                    debug_assert!(rounds <= MAX_ROUNDS, "translation of {va} did not converge");
                    self.emit(sink, Event::VaAccess { va });

                    match self.tlb.lookup(vpn, now) {
                        Some(pfn) => {
                            if rounds == 1 {
                                self.stats.tlb_hits += 1;
                            }
                            self.emit(sink, Event::TlbHit { vpn, pfn });
                            self.swap.touch(pfn, now);

                            let pa = PhysAddr::compose(pfn, va.page_offset());
                            self.emit(sink, Event::PaResult { pa });
                            return Ok(pa);
                        }
                        None => {
                            self.stats.tlb_misses += 1;
                            self.emit(sink, Event::TlbMiss { vpn });
                            Step::PtLookup
                        }
                    }
                }
                Step::PtLookup => match self.page_table.lookup(&self.frames, vpn) {
                    Some(pfn) => {
                        self.stats.pt_hits += 1;
                        self.emit(sink, Event::PtHit { vpn, pfn });
                        Step::TlbInsert(pfn)
                    }
                    None => {
                        self.stats.page_faults += 1;
                        self.emit(sink, Event::PtMiss { vpn });
                        Step::PageFault
                    }
                },
                Step::PageFault => {
                    let pfn = self.handle_page_fault(vpn)?;
                    self.emit(sink, Event::PtUpdate { vpn, pfn });
                    Step::TlbInsert(pfn)
                }
                Step::TlbInsert(pfn) => {
                    self.tlb.insert(vpn, pfn, now);
                    self.emit(sink, Event::TlbUpdate { vpn, pfn });
                    Step::TlbLookup
                }
            };
        }
    }

    /// Gives `vpn` a data frame and installs its leaf PTE.
    fn handle_page_fault(&mut self, vpn: Vpn) -> Result<Pfn, SimError> {
        let Self {
            frames,
            page_table,
            tlb,
            swap,
            ..
        } = self;
        let page_table = &*page_table;

        let pfn = allocate_frame(frames, tlb, swap, page_table, vpn, true)?;

        // The new frame has no PTE yet; keep it out of victim selection while
        // table nodes are allocated for it.
        frames.set_swappable(pfn, false);
        let installed = page_table.update(frames, vpn, pfn, |frames| {
            allocate_frame(frames, tlb, swap, page_table, vpn, false)
        });
        frames.set_swappable(pfn, true);

        installed.map(|()| pfn)
    }

    /// Checks the cross-structure invariants between frame store, page table
    /// and TLB.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut mapped_by: HashMap<Pfn, Vpn> = HashMap::new();
        for (vpn, pfn) in self.page_table.mappings(&self.frames) {
            if !self.frames.is_allocated(pfn) {
                return Err(InvariantViolation::MappedFrameFree { vpn, pfn });
            }
            if let Some(first) = mapped_by.insert(pfn, vpn) {
                return Err(InvariantViolation::SharedFrame {
                    pfn,
                    first,
                    second: vpn,
                });
            }
            let owner = self.frames.owner_of(pfn);
            if owner != vpn {
                return Err(InvariantViolation::OwnerMismatch { vpn, pfn, owner });
            }
            if !self.frames.is_swappable(pfn) {
                return Err(InvariantViolation::DataFrameNotSwappable { vpn, pfn });
            }
        }

        for pfn in self.page_table.table_frames(&self.frames) {
            if !self.frames.is_allocated(pfn) || self.frames.is_swappable(pfn) {
                return Err(InvariantViolation::TableFrameUnpinned { pfn });
            }
        }

        let mut per_page: BTreeMap<Vpn, usize> = BTreeMap::new();
        for (_, vpn, pfn) in self.tlb.entries() {
            *per_page.entry(vpn).or_default() += 1;
            let table = self.page_table.lookup(&self.frames, vpn);
            if table != Some(pfn) {
                return Err(InvariantViolation::TlbIncoherent { vpn, pfn, table });
            }
        }
        if let Some((&vpn, &count)) = per_page.iter().find(|(_, c)| **c > 1) {
            return Err(InvariantViolation::TlbDuplicate { vpn, count });
        }

        Ok(())
    }

    /// Prints TLB contents and the frame table to stderr.
    pub fn dump_state(&self) {
        eprintln!("\n[*] MMU state at t={} ({} policy)", self.clock, self.policy);
        eprintln!("    TLB:");
        for (slot, vpn, pfn) in self.tlb.entries() {
            eprintln!("      [{slot:2}] VPN {vpn} -> PFN {pfn}");
        }

        let mut line = String::new();
        for pfn in self.frames.frames() {
            let tag = match (self.frames.is_allocated(pfn), self.frames.is_swappable(pfn)) {
                (false, _) => '.',
                (true, false) => 'T',
                (true, true) => 'D',
            };
            line.push(tag);
        }
        eprintln!("    Frames (T=pinned D=data .=free):");
        for (row, chunk) in line.as_bytes().chunks(32).enumerate() {
            eprintln!("      {:3}: {}", row * 32, String::from_utf8_lossy(chunk));
        }
        eprintln!(
            "    {} of {} frames allocated, {} pinned",
            self.frames.allocated_count(),
            NUM_FRAMES,
            self.frames.pinned_count()
        );
    }
}
