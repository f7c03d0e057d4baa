//! Guest virtual address type.
//!
//! This module defines a strong type for guest addresses so that page arithmetic is
//! written once. It provides the following:
//! 1. **Type Safety:** Guest addresses are not confused with host offsets or sizes.
//! 2. **Page Geometry:** Page base, page offset, and next-page boundaries.
//! 3. **Locality Checks:** Same-page tests used by the chaining decision.

use super::constants::{PAGE_MASK, PAGE_SIZE};

/// A virtual address in the guest address space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct VirtAddr(pub u64);

impl VirtAddr {
    /// Creates a new virtual address from a raw 64-bit value.
    #[inline]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Extracts the byte offset within the containing guest page.
    ///
    /// # Returns
    ///
    /// The page offset (0-4095).
    #[inline]
    pub const fn page_offset(self) -> u64 {
        self.0 & !PAGE_MASK
    }

    /// Returns the address of the first byte of the containing page.
    #[inline]
    pub const fn page_base(self) -> u64 {
        self.0 & PAGE_MASK
    }

    /// Returns the first address of the following page.
    ///
    /// Wraps at the top of the address space, so the last page yields zero.
    #[inline]
    pub const fn next_page_start(self) -> u64 {
        self.page_base().wrapping_add(PAGE_SIZE)
    }

    /// Returns `true` when both addresses lie on the same guest page.
    #[inline]
    pub const fn same_page(self, other: Self) -> bool {
        self.page_base() == other.page_base()
    }
}

impl From<u64> for VirtAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl std::fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
