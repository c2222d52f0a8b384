//! Three-level page table stored in the frame store.
//!
//! The root node sits in frame 2. Each node is one 8-byte frame holding eight
//! [`Pte`]s indexed by one 3-bit VPN field. Interior nodes are only created when
//! a mapping is installed and are never reclaimed.

use super::pte::Pte;
use crate::common::constants::{ENTRIES_PER_TABLE, PT_LEVELS, ROOT_TABLE_FRAME};
use crate::common::{Pfn, SimError, Vpn};
use crate::system::FrameStore;

pub struct PageTable {
    root: Pfn,
}

impl PageTable {
    pub fn new() -> Self {
        Self {
            root: Pfn::new(ROOT_TABLE_FRAME),
        }
    }

    pub fn root(&self) -> Pfn {
        self.root
    }

    fn entry(mem: &FrameStore, table: Pfn, index: usize) -> Pte {
        Pte::from_bits(mem.read_u8(table, index))
    }

    fn set_entry(mem: &mut FrameStore, table: Pfn, index: usize, pte: Pte) {
        mem.write_u8(table, index, pte.bits());
    }

    /// Follows the interior levels down to the leaf table for `vpn`, stopping
    /// at the first absent entry.
    fn leaf_table(&self, mem: &FrameStore, vpn: Vpn) -> Option<Pfn> {
        let mut table = self.root;
        for level in 0..PT_LEVELS - 1 {
            table = Self::entry(mem, table, vpn.index(level)).pfn()?;
        }
        Some(table)
    }

    /// Translates `vpn` without modifying anything.
    pub fn lookup(&self, mem: &FrameStore, vpn: Vpn) -> Option<Pfn> {
        let leaf = self.leaf_table(mem, vpn)?;
        Self::entry(mem, leaf, vpn.index(PT_LEVELS - 1)).pfn()
    }

    /// Installs `vpn -> pfn`, building missing interior tables on the way.
    ///
    /// `alloc_table` must return a fresh, zeroed, non-swappable frame. It may
    /// evict data pages to do so, which only ever clears leaf entries, so the
    /// tables on this walk stay intact.
    pub fn update<F>(
        &self,
        mem: &mut FrameStore,
        vpn: Vpn,
        pfn: Pfn,
        mut alloc_table: F,
    ) -> Result<(), SimError>
    where
        F: FnMut(&mut FrameStore) -> Result<Pfn, SimError>,
    {
        let mut table = self.root;
        for level in 0..PT_LEVELS - 1 {
            let index = vpn.index(level);
            table = match Self::entry(mem, table, index).pfn() {
                Some(next) => next,
                None => {
                    let next = alloc_table(mem)?;
                    Self::set_entry(mem, table, index, Pte::new(next));
                    log::debug!("page table: level {} node for page {vpn} in frame {next}", level + 1);
                    next
                }
            };
        }

        Self::set_entry(mem, table, vpn.index(PT_LEVELS - 1), Pte::new(pfn));
        Ok(())
    }

    /// Clears the present bit of the leaf entry for `vpn`. Returns whether a
    /// present mapping was removed.
    pub fn invalidate(&self, mem: &mut FrameStore, vpn: Vpn) -> bool {
        let Some(leaf) = self.leaf_table(mem, vpn) else {
            return false;
        };

        let index = vpn.index(PT_LEVELS - 1);
        let pte = Self::entry(mem, leaf, index);
        if !pte.is_present() {
            return false;
        }
        Self::set_entry(mem, leaf, index, pte.invalidated());
        true
    }

    /// Every present leaf mapping in VPN order.
    pub fn mappings(&self, mem: &FrameStore) -> Vec<(Vpn, Pfn)> {
        let mut out = Vec::new();
        self.walk(mem, |node, level, index, pfn| {
            if level == PT_LEVELS - 1 {
                out.push((Vpn::new((node << 3) | index as u16), pfn));
            }
        });
        out
    }

    /// Every interior node reachable from the root, root included.
    pub fn table_frames(&self, mem: &FrameStore) -> Vec<Pfn> {
        let mut out = vec![self.root];
        self.walk(mem, |_, level, _, pfn| {
            if level < PT_LEVELS - 1 {
                out.push(pfn);
            }
        });
        out
    }

    /// Visits every present entry depth-first. The callback receives the VPN
    /// prefix of the node, the node's level, the entry index and its frame.
    fn walk<F>(&self, mem: &FrameStore, mut visit: F)
    where
        F: FnMut(u16, usize, usize, Pfn),
    {
        let mut stack = vec![(self.root, 0usize, 0u16)];
        while let Some((table, level, prefix)) = stack.pop() {
            // Reverse so that lower indices are visited first.
            for index in (0..ENTRIES_PER_TABLE).rev() {
                let Some(pfn) = Self::entry(mem, table, index).pfn() else {
                    continue;
                };
                if level < PT_LEVELS - 1 {
                    stack.push((pfn, level + 1, (prefix << 3) | index as u16));
                }
            }
            for index in 0..ENTRIES_PER_TABLE {
                if let Some(pfn) = Self::entry(mem, table, index).pfn() {
                    visit(prefix, level, index, pfn);
                }
            }
        }
    }
}

impl Default for PageTable {
    fn default() -> Self {
        Self::new()
    }
}
