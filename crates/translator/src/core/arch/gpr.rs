//! Integer register file.

/// Integer registers per hart.
pub const GPR_COUNT: usize = 32;

/// `x0`..`x31`. `x0` reads as zero whatever is written to it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gpr {
    regs: [u64; GPR_COUNT],
}

impl Gpr {
    /// All registers zero.
    pub const fn new() -> Self {
        Self {
            regs: [0; GPR_COUNT],
        }
    }

    /// Value of `x{idx}`.
    #[inline]
    pub const fn read(&self, idx: usize) -> u64 {
        if idx == 0 { 0 } else { self.regs[idx] }
    }

    /// Writes to `x0` are discarded.
    #[inline]
    pub const fn write(&mut self, idx: usize, val: u64) {
        if idx != 0 {
            self.regs[idx] = val;
        }
    }
}
