//! Guest memory.
//!
//! The translator reaches guest memory through two seams:
//! 1. **Code Fetch:** [`CodeFetch`], used by the block builder to read instruction words.
//! 2. **Data Bus:** [`GuestBus`], used by translated code for loads and stores.
//!
//! [`GuestMemory`] implements both over a set of permission-checked regions.

use crate::common::{MemFault, VirtAddr};
use crate::core::arch::mode::PrivilegeMode;
use crate::ir::op::MemWidth;

/// Page-granular guest memory regions.
pub mod guest;

pub use guest::{GuestMemory, Perms};

/// Instruction fetch interface consumed by the block builder.
pub trait CodeFetch {
    /// Reads the 32-bit instruction word at `addr` with the access rights of `mode`.
    fn fetch_instruction(&self, addr: VirtAddr, mode: PrivilegeMode) -> Result<u32, MemFault>;
}

/// Data access interface consumed by translated code.
pub trait GuestBus {
    /// Loads `width` bytes from `addr`, zero-extended to 64 bits.
    fn load(&self, addr: VirtAddr, width: MemWidth, mode: PrivilegeMode) -> Result<u64, MemFault>;

    /// Stores the low `width` bytes of `val` to `addr`.
    fn store(
        &mut self,
        addr: VirtAddr,
        width: MemWidth,
        val: u64,
        mode: PrivilegeMode,
    ) -> Result<(), MemFault>;
}
