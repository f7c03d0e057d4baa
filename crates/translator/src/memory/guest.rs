//! Guest memory regions.
//!
//! Memory is a list of non-overlapping regions, each backed by a byte vector and
//! tagged with access permissions. Accesses must be naturally aligned and must lie
//! entirely inside one region.
//!
//! Every successful store records the guest page it touched. The dispatcher drains
//! that set after each block so translated code overlapping a written page can be
//! discarded before it runs again.

use std::collections::BTreeSet;

use tracing::debug;

use crate::common::{Error, MemFault, PAGE_SHIFT, VirtAddr};
use crate::core::arch::mode::PrivilegeMode;
use crate::ir::op::MemWidth;
use crate::memory::{CodeFetch, GuestBus};

/// Access permissions of a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Perms {
    /// Loads allowed.
    pub read: bool,
    /// Stores allowed.
    pub write: bool,
    /// Instruction fetch allowed.
    pub exec: bool,
    /// Accessible from user mode.
    pub user: bool,
}

impl Perms {
    /// Read-only data.
    pub const R: Self = Self::new(true, false, false);
    /// Read-write data.
    pub const RW: Self = Self::new(true, true, false);
    /// Read-only code.
    pub const RX: Self = Self::new(true, false, true);
    /// Read-write code.
    pub const RWX: Self = Self::new(true, true, true);
    /// Execute-only code.
    pub const X: Self = Self::new(false, false, true);

    /// Supervisor-only permissions.
    pub const fn new(read: bool, write: bool, exec: bool) -> Self {
        Self {
            read,
            write,
            exec,
            user: false,
        }
    }

    /// Returns the same permissions, also granted to user mode.
    pub const fn with_user(self) -> Self {
        Self { user: true, ..self }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Access {
    Fetch,
    Load,
    Store,
}

#[derive(Clone, Debug)]
struct Region {
    base: u64,
    data: Vec<u8>,
    perms: Perms,
}

impl Region {
    fn end(&self) -> u64 {
        self.base + self.data.len() as u64
    }

    fn contains(&self, addr: u64, len: u64) -> bool {
        addr >= self.base && addr.checked_add(len).is_some_and(|end| end <= self.end())
    }

    const fn allows(&self, access: Access, mode: PrivilegeMode) -> bool {
        let kind = match access {
            Access::Fetch => self.perms.exec,
            Access::Load => self.perms.read,
            Access::Store => self.perms.write,
        };
        kind && (self.perms.user || !matches!(mode, PrivilegeMode::User))
    }
}

/// Flat guest memory made of permission-checked regions.
#[derive(Clone, Debug, Default)]
pub struct GuestMemory {
    regions: Vec<Region>,
    written_pages: BTreeSet<u64>,
}

impl GuestMemory {
    /// Creates an empty address space.
    pub const fn new() -> Self {
        Self {
            regions: Vec::new(),
            written_pages: BTreeSet::new(),
        }
    }

    /// Maps `size` zeroed bytes at `base` with `perms`.
    ///
    /// # Errors
    ///
    /// [`Error::MappingOverlap`] when the range intersects an existing region or wraps.
    /// [`Error::OutOfMemory`] when the host cannot back `size` bytes.
    pub fn map(&mut self, base: u64, size: u64, perms: Perms) -> Result<(), Error> {
        let end = base
            .checked_add(size)
            .ok_or(Error::MappingOverlap { base, size })?;
        if self.regions.iter().any(|r| base < r.end() && r.base < end) {
            return Err(Error::MappingOverlap { base, size });
        }
        let len = usize::try_from(size).map_err(|_| Error::OutOfMemory { base, size })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| Error::OutOfMemory { base, size })?;
        data.resize(len, 0);
        debug!(base = %VirtAddr::new(base), size, ?perms, "mapping guest region");
        self.regions.push(Region { base, data, perms });
        self.regions.sort_by_key(|r| r.base);
        Ok(())
    }

    /// Returns `true` when every byte of `[addr, addr + len)` is mapped.
    pub fn is_mapped(&self, addr: u64, len: u64) -> bool {
        let mut cur = addr;
        let Some(end) = addr.checked_add(len) else {
            return false;
        };
        while cur < end {
            match self.regions.iter().find(|r| r.contains(cur, 1)) {
                Some(r) => cur = r.end(),
                None => return false,
            }
        }
        true
    }

    /// Copies `bytes` into guest memory, bypassing permissions.
    ///
    /// Used by loaders and debuggers. The written pages are recorded like guest stores.
    pub fn write_bytes(&mut self, addr: u64, bytes: &[u8]) -> Result<(), MemFault> {
        let mut cur = addr;
        let mut rest = bytes;
        while !rest.is_empty() {
            let region = self
                .regions
                .iter_mut()
                .find(|r| r.contains(cur, 1))
                .ok_or(MemFault::AccessFault(cur))?;
            let off = (cur - region.base) as usize;
            let n = rest.len().min(region.data.len() - off);
            region.data[off..off + n].copy_from_slice(&rest[..n]);
            for page in (cur >> PAGE_SHIFT)..=((cur + n as u64 - 1) >> PAGE_SHIFT) {
                let _ = self.written_pages.insert(page << PAGE_SHIFT);
            }
            cur += n as u64;
            rest = &rest[n..];
        }
        Ok(())
    }

    /// Copies `len` bytes out of guest memory, bypassing permissions.
    pub fn read_bytes(&self, addr: u64, len: usize) -> Result<Vec<u8>, MemFault> {
        let region = self
            .regions
            .iter()
            .find(|r| r.contains(addr, len as u64))
            .ok_or(MemFault::AccessFault(addr))?;
        let off = (addr - region.base) as usize;
        Ok(region.data[off..off + len].to_vec())
    }

    /// Drains the set of page base addresses written since the last call.
    pub fn take_written_pages(&mut self) -> BTreeSet<u64> {
        std::mem::take(&mut self.written_pages)
    }

    fn locate(
        &self,
        addr: u64,
        len: u64,
        access: Access,
        mode: PrivilegeMode,
    ) -> Result<(usize, usize), MemFault> {
        if addr % len != 0 {
            return Err(MemFault::Misaligned(addr));
        }
        let (idx, region) = self
            .regions
            .iter()
            .enumerate()
            .find(|(_, r)| r.contains(addr, len))
            .ok_or(MemFault::AccessFault(addr))?;
        if !region.allows(access, mode) {
            return Err(MemFault::PageFault(addr));
        }
        Ok((idx, (addr - region.base) as usize))
    }

    fn read_le(&self, addr: u64, len: u64, access: Access, mode: PrivilegeMode) -> Result<u64, MemFault> {
        let (idx, off) = self.locate(addr, len, access, mode)?;
        let bytes = &self.regions[idx].data[off..off + len as usize];
        Ok(bytes
            .iter()
            .rev()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
    }
}

impl CodeFetch for GuestMemory {
    fn fetch_instruction(&self, addr: VirtAddr, mode: PrivilegeMode) -> Result<u32, MemFault> {
        self.read_le(addr.val(), 4, Access::Fetch, mode)
            .map(|w| w as u32)
    }
}

impl GuestBus for GuestMemory {
    fn load(&self, addr: VirtAddr, width: MemWidth, mode: PrivilegeMode) -> Result<u64, MemFault> {
        self.read_le(addr.val(), width.bytes(), Access::Load, mode)
    }

    fn store(
        &mut self,
        addr: VirtAddr,
        width: MemWidth,
        val: u64,
        mode: PrivilegeMode,
    ) -> Result<(), MemFault> {
        let len = width.bytes();
        let (idx, off) = self.locate(addr.val(), len, Access::Store, mode)?;
        let bytes = val.to_le_bytes();
        self.regions[idx].data[off..off + len as usize].copy_from_slice(&bytes[..len as usize]);
        let _ = self.written_pages.insert(addr.page_base());
        Ok(())
    }
}
