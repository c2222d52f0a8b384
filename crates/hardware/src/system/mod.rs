pub mod memory;

pub use self::memory::FrameStore;
