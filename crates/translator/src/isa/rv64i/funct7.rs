//! RISC-V Base Integer (I) Function Codes (funct7).

/// Default operation (ADD, SRL, etc.).
pub const DEFAULT: u32 = 0b000_0000;

/// Alternate operation (SUB, SRA).
pub const ALT: u32 = 0b010_0000;

/// Upper six bits of the shift-immediate field for SRAI on RV64.
pub const SRAI_FUNCT6: u32 = 0b01_0000;
