//! RV64I major opcodes (bits 6..0).

/// Loads of every width.
pub const OP_LOAD: u32 = 0b000_0011;
/// `FENCE`, `FENCE.I`.
pub const OP_MISC_MEM: u32 = 0b000_1111;
/// Register-immediate ALU.
pub const OP_IMM: u32 = 0b001_0011;
/// `AUIPC`.
pub const OP_AUIPC: u32 = 0b001_0111;
/// `ADDIW` and the 32-bit immediate shifts.
pub const OP_IMM_32: u32 = 0b001_1011;
/// Stores of every width.
pub const OP_STORE: u32 = 0b010_0011;
/// Register-register ALU.
pub const OP_REG: u32 = 0b011_0011;
/// `LUI`.
pub const OP_LUI: u32 = 0b011_0111;
/// `ADDW`, `SUBW` and the 32-bit register shifts.
pub const OP_REG_32: u32 = 0b011_1011;
/// Conditional branches.
pub const OP_BRANCH: u32 = 0b110_0011;
/// `JALR`.
pub const OP_JALR: u32 = 0b110_0111;
/// `JAL`.
pub const OP_JAL: u32 = 0b110_1111;
