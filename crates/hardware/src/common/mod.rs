//! Types shared by every component: address newtypes, fixed geometry and errors.

pub mod addr;
pub mod constants;
pub mod error;

pub use self::addr::{PhysAddr, Pfn, VirtAddr, Vpn};
pub use self::error::{InvariantViolation, SimError};
