//! MMU translation and swap simulator core.
//!
//! Models a 12-bit virtual address space translated through a 16-entry TLB and
//! a 3-level page table that lives inside a 1 KiB physical store. When the
//! store runs out of frames, a swap engine evicts a data page under the same
//! replacement policy (round-robin or LRU) that governs the TLB.
//!
//! - [`system::memory::FrameStore`] owns physical bytes and frame ownership.
//! - [`core::mmu::Mmu`] is the simulation context and the translation state machine.
//! - [`sim`] holds the collaborators around the core: trace I/O, event logs and
//!   workload generation.

pub mod common;
pub mod config;
pub mod core;
pub mod sim;
pub mod stats;
pub mod system;

pub use crate::common::{PhysAddr, Pfn, SimError, VirtAddr, Vpn};
pub use crate::config::{Config, Policy};
pub use crate::core::Mmu;
