//! `funct3` (bits 14..12), grouped by the major opcode it qualifies.

/// `OP_LOAD` widths.
pub mod load {
    /// Sign-extended byte.
    pub const LB: u32 = 0b000;
    /// Sign-extended halfword.
    pub const LH: u32 = 0b001;
    /// Sign-extended word.
    pub const LW: u32 = 0b010;
    /// Doubleword.
    pub const LD: u32 = 0b011;
    /// Zero-extended byte.
    pub const LBU: u32 = 0b100;
    /// Zero-extended halfword.
    pub const LHU: u32 = 0b101;
    /// Zero-extended word, RV64 only.
    pub const LWU: u32 = 0b110;
}

/// `OP_STORE` widths.
pub mod store {
    /// Low byte.
    pub const SB: u32 = 0b000;
    /// Low halfword.
    pub const SH: u32 = 0b001;
    /// Low word.
    pub const SW: u32 = 0b010;
    /// Full register.
    pub const SD: u32 = 0b011;
}

/// `OP_BRANCH` conditions; 0b010 and 0b011 are unassigned.
pub mod branch {
    /// Taken when equal.
    pub const BEQ: u32 = 0b000;
    /// Taken when not equal.
    pub const BNE: u32 = 0b001;
    /// Signed `<`.
    pub const BLT: u32 = 0b100;
    /// Signed `>=`.
    pub const BGE: u32 = 0b101;
    /// Unsigned `<`.
    pub const BLTU: u32 = 0b110;
    /// Unsigned `>=`.
    pub const BGEU: u32 = 0b111;
}

/// Shared by `OP_IMM`, `OP_REG` and their `*W` forms. `funct7` tells the
/// paired operations apart.
pub mod alu {
    /// `ADD`, or `SUB` with the alternate `funct7`.
    pub const ADD_SUB: u32 = 0b000;
    /// Left shift.
    pub const SLL: u32 = 0b001;
    /// Signed compare.
    pub const SLT: u32 = 0b010;
    /// Unsigned compare.
    pub const SLTU: u32 = 0b011;
    /// Exclusive or.
    pub const XOR: u32 = 0b100;
    /// Logical right shift, or arithmetic with the alternate `funct7`.
    pub const SRL_SRA: u32 = 0b101;
    /// Inclusive or.
    pub const OR: u32 = 0b110;
    /// Bitwise and.
    pub const AND: u32 = 0b111;
}

/// `OP_MISC_MEM`.
pub mod fence {
    /// Data ordering; a no-op for a single hart.
    pub const FENCE: u32 = 0b000;
    /// Instruction-stream sync; ends the block.
    pub const FENCE_I: u32 = 0b001;
}

/// The only valid `funct3` for `JALR`.
pub const JALR: u32 = 0b000;
