//! One-byte page-table entry: `| present(1) | pfn(7) |`.

use crate::common::Pfn;
use crate::common::constants::PTE_PRESENT;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pte(u8);

impl Pte {
    /// A present entry pointing at `pfn`.
    pub fn new(pfn: Pfn) -> Self {
        Self(PTE_PRESENT | pfn.val())
    }

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_present(&self) -> bool {
        self.0 & PTE_PRESENT != 0
    }

    /// Frame of a present entry. A cleared entry keeps its stale frame bits,
    /// which must not be read.
    pub fn pfn(&self) -> Option<Pfn> {
        self.is_present().then(|| Pfn::from_pte_bits(self.0))
    }

    /// The same entry with the present bit cleared.
    pub fn invalidated(&self) -> Self {
        Self(self.0 & !PTE_PRESENT)
    }
}
