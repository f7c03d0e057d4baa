//! Register banks of one hart.
//!
//! Integer and floating-point registers are stored side by side and addressed
//! through a [`Bank`] selector. The integer bank keeps `x0` at zero; the
//! floating-point bank holds raw bit patterns.

use crate::core::arch::fpr::{FPR_COUNT, Fpr};
use crate::core::arch::gpr::{GPR_COUNT, Gpr};

/// Which register bank an index refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bank {
    /// `x0`..`x31`.
    Int,
    /// `f0`..`f31`.
    Float,
}

/// Integer and floating-point registers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    gpr: Gpr,
    fpr: Fpr,
}

impl RegisterFile {
    /// All registers zero.
    pub const fn new() -> Self {
        Self {
            gpr: Gpr::new(),
            fpr: Fpr::new(),
        }
    }

    /// Reads register `idx` of `bank`.
    #[inline]
    pub const fn read(&self, bank: Bank, idx: usize) -> u64 {
        match bank {
            Bank::Int => self.gpr.read(idx),
            Bank::Float => self.fpr.read(idx),
        }
    }

    /// Writes register `idx` of `bank`. Integer writes to `x0` are dropped.
    #[inline]
    pub const fn write(&mut self, bank: Bank, idx: usize, val: u64) {
        match bank {
            Bank::Int => self.gpr.write(idx, val),
            Bank::Float => self.fpr.write(idx, val),
        }
    }

    /// Every register of `bank` in index order.
    pub fn iter(&self, bank: Bank) -> impl Iterator<Item = u64> + '_ {
        let count = match bank {
            Bank::Int => GPR_COUNT,
            Bank::Float => FPR_COUNT,
        };
        (0..count).map(move |idx| self.read(bank, idx))
    }
}
