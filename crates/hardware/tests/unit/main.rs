//! # Unit Tests
//!
//! Component-level tests for the frame store, page table, TLB, replacement
//! policies, swap engine, translator and the simulation collaborators.

/// Shared helpers for building addresses and driving translations.
pub mod common;
