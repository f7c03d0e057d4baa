//! Guest CPU State.
//!
//! This module defines [`CpuState`], the architectural state of one guest hart:
//! 1. **Registers:** 32 GPRs (x0 hard-wired to zero) and 32 raw 64-bit FPRs.
//! 2. **Control State:** Program counter, sparse CSR file, privilege mode.
//! 3. **Auxiliary State:** Floating-point environment and the LR/SC reservation.
//!
//! Accessors perform no index validation beyond what the register files do; writes
//! are visible immediately.

/// Formatted dump of the CPU state.
pub mod dump;

use crate::common::reg::{Bank, RegisterFile};
use crate::common::VirtAddr;
use crate::core::arch::csr::{Csrs, MISA};
use crate::core::arch::fpu::FpStatus;
use crate::core::arch::mode::PrivilegeMode;
use crate::core::model::CpuModel;

/// Architectural state of one guest hart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CpuState {
    /// General Purpose and Floating Point Registers.
    pub regs: RegisterFile,
    pc: VirtAddr,
    /// Control and Status Registers.
    pub csrs: Csrs,
    /// Current Privilege Mode (M, S, U).
    pub privilege: PrivilegeMode,
    /// Floating-point environment.
    pub fp_status: FpStatus,
    /// Load Reservation address (for LR/SC).
    pub load_res: Option<u64>,
    model: &'static CpuModel,
}

impl CpuState {
    /// Creates a fresh hart for `model`.
    ///
    /// All registers and CSRs are zero except `misa`, which is taken from the
    /// model. The hart starts in machine mode with round-to-nearest-even and
    /// default-NaN mode enabled.
    pub fn new(model: &'static CpuModel) -> Self {
        let mut csrs = Csrs::new();
        csrs.write(MISA, model.init_misa);
        Self {
            regs: RegisterFile::new(),
            pc: VirtAddr::default(),
            csrs,
            privilege: PrivilegeMode::Machine,
            fp_status: FpStatus::default(),
            load_res: None,
            model,
        }
    }

    /// Model this hart was created from.
    pub const fn model(&self) -> &'static CpuModel {
        self.model
    }

    /// Reads integer register `idx`; `x0` always reads as 0.
    pub fn read_register(&self, idx: usize) -> u64 {
        self.regs.read(Bank::Int, idx)
    }

    /// Writes integer register `idx`; writes to `x0` are ignored.
    pub fn write_register(&mut self, idx: usize, val: u64) {
        self.regs.write(Bank::Int, idx, val);
    }

    /// Reads the raw bits of floating-point register `idx`.
    pub fn read_fp_register(&self, idx: usize) -> u64 {
        self.regs.read(Bank::Float, idx)
    }

    /// Writes the raw bits of floating-point register `idx`.
    pub fn write_fp_register(&mut self, idx: usize, val: u64) {
        self.regs.write(Bank::Float, idx, val);
    }

    /// Program counter.
    pub const fn pc(&self) -> VirtAddr {
        self.pc
    }

    /// Sets the program counter.
    pub const fn set_pc(&mut self, pc: VirtAddr) {
        self.pc = pc;
    }

    /// Reads CSR `idx`.
    pub fn read_csr(&self, idx: u32) -> u64 {
        self.csrs.read(idx)
    }

    /// Writes CSR `idx`.
    pub fn write_csr(&mut self, idx: u32, val: u64) {
        self.csrs.write(idx, val);
    }
}
