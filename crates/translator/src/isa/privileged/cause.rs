//! Trap cause codes.
//!
//! Synchronous exception codes as written to `mcause`, plus the debug stop the
//! translator raises for breakpoints and single-step. The debug code sits above
//! every architectural cause so a guest can never observe or raise it.

/// Debugger stop. Never delivered to the guest.
pub const EXCP_DEBUG: u64 = 0x1_0002;

/// Architectural exception codes (interrupt bit clear).
pub mod exception {
    /// Jump or branch target not on an instruction boundary.
    pub const INSTRUCTION_ADDRESS_MISALIGNED: u64 = 0;
    /// Fetch from unmapped memory.
    pub const INSTRUCTION_ACCESS_FAULT: u64 = 1;
    /// Unrecognized or reserved encoding.
    pub const ILLEGAL_INSTRUCTION: u64 = 2;
    /// `EBREAK`; `tval` is the faulting pc.
    pub const BREAKPOINT: u64 = 3;
    /// Load not naturally aligned.
    pub const LOAD_ADDRESS_MISALIGNED: u64 = 4;
    /// Load from unmapped memory.
    pub const LOAD_ACCESS_FAULT: u64 = 5;
    /// Store not naturally aligned.
    pub const STORE_ADDRESS_MISALIGNED: u64 = 6;
    /// Store to unmapped memory.
    pub const STORE_ACCESS_FAULT: u64 = 7;
    /// `ECALL` in U-mode.
    pub const ENVIRONMENT_CALL_FROM_U_MODE: u64 = 8;
    /// `ECALL` in S-mode.
    pub const ENVIRONMENT_CALL_FROM_S_MODE: u64 = 9;
    // 10 is reserved.
    /// `ECALL` in M-mode.
    pub const ENVIRONMENT_CALL_FROM_M_MODE: u64 = 11;
    /// Fetch denied by page permissions.
    pub const INSTRUCTION_PAGE_FAULT: u64 = 12;
    /// Load denied by page permissions.
    pub const LOAD_PAGE_FAULT: u64 = 13;
    // 14 is reserved.
    /// Store denied by page permissions.
    pub const STORE_PAGE_FAULT: u64 = 15;
}
