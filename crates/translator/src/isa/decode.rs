//! RISC-V Instruction Field Decoder.
//!
//! This module splits a 32-bit RISC-V encoding into a structured [`Decoded`]
//! value. It extracts opcodes, register indices and function codes, and
//! sign-extends the immediate for every base format (R, I, S, B, U, J).

use crate::isa::instruction::{Decoded, InstructionBits};
use crate::isa::privileged::opcodes::OP_SYSTEM;
use crate::isa::rv64i::opcodes;

/// Total width of a RISC-V instruction in bits.
const INSTRUCTION_BITS: u32 = 32;

/// Bit shift for the I-Type immediate (bits 20-31).
const I_IMM_SHIFT: u32 = 20;

/// S-Type immediate: `imm[11:5]` at bit 25, `imm[4:0]` at bit 7.
const S_IMM_LOW_SHIFT: u32 = 7;
const S_IMM_HIGH_SHIFT: u32 = 25;
const S_IMM_BITS: u32 = 12;

/// B-Type immediate is 13 bits wide, always even.
const B_IMM_BITS: u32 = 13;

/// U-Type immediate occupies bits 12-31 in place.
const U_IMM_MASK: u32 = 0xFFFF_F000;

/// J-Type immediate is 21 bits wide, always even.
const J_IMM_BITS: u32 = 21;

/// Decodes a RISC-V instruction into its component fields.
///
/// Opcodes that carry no immediate decode with `imm == 0`.
pub fn decode(inst: u32) -> Decoded {
    let opcode = inst.opcode();

    let imm = match opcode {
        opcodes::OP_IMM
        | opcodes::OP_LOAD
        | opcodes::OP_JALR
        | opcodes::OP_IMM_32
        | opcodes::OP_MISC_MEM
        | OP_SYSTEM => i_type_imm(inst),
        opcodes::OP_STORE => s_type_imm(inst),
        opcodes::OP_BRANCH => b_type_imm(inst),
        opcodes::OP_LUI | opcodes::OP_AUIPC => u_type_imm(inst),
        opcodes::OP_JAL => j_type_imm(inst),
        _ => 0,
    };

    Decoded {
        raw: inst,
        opcode,
        rd: inst.rd(),
        rs1: inst.rs1(),
        rs2: inst.rs2(),
        funct3: inst.funct3(),
        funct7: inst.funct7(),
        imm,
    }
}

/// `imm[11:0] | rs1 | funct3 | rd | opcode`
const fn i_type_imm(inst: u32) -> i64 {
    ((inst as i32) >> I_IMM_SHIFT) as i64
}

/// `imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`
const fn s_type_imm(inst: u32) -> i64 {
    let low = (inst >> S_IMM_LOW_SHIFT) & 0x1F;
    let high = (inst >> S_IMM_HIGH_SHIFT) & 0x7F;
    sign_extend((high << 5) | low, S_IMM_BITS)
}

/// `imm[12] | imm[10:5] | rs2 | rs1 | funct3 | imm[4:1] | imm[11] | opcode`
const fn b_type_imm(inst: u32) -> i64 {
    let bit_11 = (inst >> 7) & 0x1;
    let bits_4_1 = (inst >> 8) & 0xF;
    let bits_10_5 = (inst >> 25) & 0x3F;
    let bit_12 = (inst >> 31) & 0x1;
    let combined = (bit_12 << 12) | (bit_11 << 11) | (bits_10_5 << 5) | (bits_4_1 << 1);
    sign_extend(combined, B_IMM_BITS)
}

/// `imm[31:12] | rd | opcode`
const fn u_type_imm(inst: u32) -> i64 {
    ((inst & U_IMM_MASK) as i32) as i64
}

/// `imm[20] | imm[10:1] | imm[11] | imm[19:12] | rd | opcode`
const fn j_type_imm(inst: u32) -> i64 {
    let bits_19_12 = (inst >> 12) & 0xFF;
    let bit_11 = (inst >> 20) & 0x1;
    let bits_10_1 = (inst >> 21) & 0x3FF;
    let bit_20 = (inst >> 31) & 0x1;
    let combined = (bit_20 << 20) | (bits_19_12 << 12) | (bit_11 << 11) | (bits_10_1 << 1);
    sign_extend(combined, J_IMM_BITS)
}

/// Sign extends a value of `bits` width to a 64-bit signed integer.
const fn sign_extend(val: u32, bits: u32) -> i64 {
    let shift = INSTRUCTION_BITS - bits;
    (((val as i32) << shift) >> shift) as i64
}
