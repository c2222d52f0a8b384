//! Run statistics.

use serde::Serialize;

/// Counters collected by [`crate::core::Mmu`] over a run.
///
/// Rates are relative to top-level accesses, not to retry rounds.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SimStats {
    pub accesses: u64,
    pub tlb_hits: u64,
    pub tlb_misses: u64,
    pub pt_hits: u64,
    pub page_faults: u64,
    pub evictions: u64,
    pub table_frames: u64,
}

impl SimStats {
    fn rate(count: u64, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        }
    }

    /// Percentage of accesses whose first TLB lookup missed.
    pub fn tlb_miss_rate(&self) -> f64 {
        Self::rate(self.tlb_misses, self.accesses)
    }

    /// Percentage of accesses that page faulted.
    pub fn page_fault_rate(&self) -> f64 {
        Self::rate(self.page_faults, self.accesses)
    }

    /// Stats plus derived rates as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(map) = value.as_object_mut() {
            map.insert("tlb_miss_rate".into(), self.tlb_miss_rate().into());
            map.insert("page_fault_rate".into(), self.page_fault_rate().into());
        }
        value
    }

    pub fn print(&self) {
        println!("==========================================================");
        println!("MMU SIMULATION STATISTICS");
        println!("==========================================================");
        println!("accesses                 {}", self.accesses);
        println!(
            "tlb                      {} hits, {} misses ({:.2}% miss)",
            self.tlb_hits,
            self.tlb_misses,
            self.tlb_miss_rate()
        );
        println!(
            "page table               {} hits, {} faults ({:.2}% fault)",
            self.pt_hits,
            self.page_faults,
            self.page_fault_rate()
        );
        println!("evictions                {}", self.evictions);
        println!("table frames             {}", self.table_frames);
        println!("==========================================================");
    }
}
