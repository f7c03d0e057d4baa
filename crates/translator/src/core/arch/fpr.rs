//! RISC-V Floating-Point Register File.
//!
//! Floating-point semantics are outside the translator; registers are kept as raw 64-bit
//! patterns so that NaN payloads survive untouched and the state dump prints exact bits.

/// Number of floating-point registers.
pub const FPR_COUNT: usize = 32;

/// Floating-Point Register file holding raw IEEE 754 bit patterns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fpr {
    fregs: [u64; FPR_COUNT],
}

impl Fpr {
    /// Creates a new floating-point register file with all registers set to `+0.0`.
    pub const fn new() -> Self {
        Self {
            fregs: [0; FPR_COUNT],
        }
    }

    /// Reads a floating-point register as raw bits.
    #[inline]
    pub const fn read(&self, idx: usize) -> u64 {
        self.fregs[idx]
    }

    /// Writes a floating-point register from raw bits.
    #[inline]
    pub const fn write(&mut self, idx: usize, val: u64) {
        self.fregs[idx] = val;
    }
}
