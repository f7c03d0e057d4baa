//! `SYSTEM` encodings handled by the translator.

/// Major opcode shared by every `SYSTEM` instruction.
pub const OP_SYSTEM: u32 = 0b111_0011;

/// `ECALL`; the whole word is fixed.
pub const ECALL: u32 = OP_SYSTEM;
/// `EBREAK`; the whole word is fixed.
pub const EBREAK: u32 = (1 << 20) | OP_SYSTEM;
