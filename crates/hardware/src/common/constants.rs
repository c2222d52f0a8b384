//! Fixed machine geometry.

/// Size of the simulated physical store in bytes.
pub const MEM_SIZE: usize = 1024;

/// Page and frame size in bytes.
pub const PAGE_SIZE: usize = 8;

/// Number of physical frames.
pub const NUM_FRAMES: usize = MEM_SIZE / PAGE_SIZE;

/// Number of TLB entries.
pub const TLB_SIZE: usize = 16;

/// Width of the virtual address.
pub const VA_BITS: u32 = 12;

/// Mask selecting the valid bits of a virtual address.
pub const VA_MASK: u16 = (1 << VA_BITS) - 1;

/// Width of the page offset and of each VPN component.
pub const OFFSET_BITS: u32 = 3;

/// Mask for one 3-bit address field.
pub const FIELD_MASK: u16 = 0x7;

/// Number of distinct virtual pages (9-bit VPN).
pub const NUM_PAGES: usize = 1 << (VA_BITS - OFFSET_BITS);

/// PTEs per table node (one frame).
pub const ENTRIES_PER_TABLE: usize = PAGE_SIZE;

/// Depth of the page-table trie.
pub const PT_LEVELS: usize = 3;

/// Frames 0 and 1 hold the swappable bitmask.
pub const BITMASK_FRAMES: usize = 2;

/// Frame holding the root page table.
pub const ROOT_TABLE_FRAME: u8 = 2;

/// Lowest frame the allocator hands out.
pub const FIRST_FREE_FRAME: usize = 3;

/// Present bit of a PTE.
pub const PTE_PRESENT: u8 = 0x80;

/// Frame-number bits of a PTE.
pub const PTE_PFN_MASK: u8 = 0x7F;
