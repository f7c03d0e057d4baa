//! CPU state dump.
//!
//! Produces the classic register dump: the PC, the integer registers four per
//! line under their ABI names, `mstatus`/`mip`/`mie`, then the floating-point
//! registers four per line, each row prefixed with `FPRnn:`. All values are
//! 16-digit hex.

use std::fmt::{self, Write};

use crate::common::reg::Bank;
use crate::core::arch::csr::{MIE, MIP, MSTATUS};
use crate::core::cpu::CpuState;
use crate::isa::abi::{FPR_NAMES, GPR_NAMES};

impl CpuState {
    /// Writes the register dump to `out`.
    pub fn dump_state<W: Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "pc=0x{:016x}", self.pc().val())?;
        for (i, (name, val)) in GPR_NAMES.iter().zip(self.regs.iter(Bank::Int)).enumerate() {
            write!(out, " {name} {val:016x}")?;
            if i & 3 == 3 {
                writeln!(out)?;
            }
        }

        for (label, csr) in [("MSTATUS ", MSTATUS), ("MIP     ", MIP), ("MIE     ", MIE)] {
            writeln!(out, " {label} {:016x}", self.read_csr(csr))?;
        }

        for (i, (name, val)) in FPR_NAMES.iter().zip(self.regs.iter(Bank::Float)).enumerate() {
            if i & 3 == 0 {
                write!(out, "FPR{i:02}:")?;
            }
            write!(out, " {name} {val:016x}")?;
            if i & 3 == 3 {
                writeln!(out)?;
            }
        }
        Ok(())
    }

    /// Returns the register dump as a string.
    pub fn dump(&self) -> String {
        let mut s = String::new();
        // Writing to a String cannot fail.
        let _ = self.dump_state(&mut s);
        s
    }
}

impl fmt::Display for CpuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dump_state(f)
    }
}
