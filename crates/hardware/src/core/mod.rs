pub mod mmu;
pub mod policy;

pub use self::mmu::Mmu;
