//! CSR addresses and the sparse CSR store.
//!
//! Only the registers the translator consults (`misa`) or the state dump
//! prints are named here. Every other index is still readable and writable
//! through [`Csrs`]; nothing validates privilege or range.

use std::collections::BTreeMap;

/// `mstatus`.
pub const MSTATUS: u32 = 0x300;
/// `misa`.
pub const MISA: u32 = 0x301;
/// `mie`.
pub const MIE: u32 = 0x304;
/// `mip`.
pub const MIP: u32 = 0x344;

/// `misa` bit of extension `letter`.
const fn ext(letter: u8) -> u64 {
    1 << (letter - b'A')
}

/// Atomics.
pub const MISA_EXT_A: u64 = ext(b'A');
/// Compressed instructions. Relaxes the fetch alignment of jump targets to 2 bytes.
pub const MISA_EXT_C: u64 = ext(b'C');
/// Double-precision float.
pub const MISA_EXT_D: u64 = ext(b'D');
/// Single-precision float.
pub const MISA_EXT_F: u64 = ext(b'F');
/// Base integer ISA.
pub const MISA_EXT_I: u64 = ext(b'I');
/// Multiply and divide.
pub const MISA_EXT_M: u64 = ext(b'M');
/// Supervisor mode.
pub const MISA_EXT_S: u64 = ext(b'S');
/// User mode.
pub const MISA_EXT_U: u64 = ext(b'U');

/// `MXL = 2` in the top two bits.
pub const MISA_XLEN_64: u64 = 2 << 62;

/// Sparse CSR file; indices never written read as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Csrs {
    regs: BTreeMap<u32, u64>,
}

impl Csrs {
    /// Every CSR reads as zero.
    pub const fn new() -> Self {
        Self {
            regs: BTreeMap::new(),
        }
    }

    /// Value of CSR `addr`.
    pub fn read(&self, addr: u32) -> u64 {
        self.regs.get(&addr).copied().unwrap_or_default()
    }

    /// Zero writes drop the entry so the map only holds live registers.
    pub fn write(&mut self, addr: u32, val: u64) {
        if val == 0 {
            let _ = self.regs.remove(&addr);
        } else {
            let _ = self.regs.insert(addr, val);
        }
    }
}
