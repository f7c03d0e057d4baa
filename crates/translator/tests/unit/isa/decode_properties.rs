//! # Instruction Decode Properties
//!
//! `decode()` must agree with the encoder used throughout the suite for every
//! format the RV64I decoder consumes.

use proptest::prelude::*;
use rvdbt_core::isa::decode::decode;
use rvdbt_core::isa::instruction::InstructionBits;
use rvdbt_core::isa::rv64i::opcodes::{OP_BRANCH, OP_IMM, OP_JAL, OP_LUI, OP_STORE};

use crate::common::builder::instruction::insn;

proptest! {
    #[test]
    fn i_type_immediate_sign_extends(rd in 0u32..32, rs1 in 0u32..32, imm in -2048i32..2048) {
        let d = decode(insn().addi(rd, rs1, imm).build());
        prop_assert_eq!(d.opcode, OP_IMM);
        prop_assert_eq!(d.rd, rd as usize);
        prop_assert_eq!(d.rs1, rs1 as usize);
        prop_assert_eq!(d.imm, i64::from(imm));
    }

    #[test]
    fn s_type_immediate(rs1 in 0u32..32, rs2 in 0u32..32, imm in -2048i32..2048) {
        let d = decode(insn().sd(rs1, rs2, imm).build());
        prop_assert_eq!(d.opcode, OP_STORE);
        prop_assert_eq!(d.rs2, rs2 as usize);
        prop_assert_eq!(d.imm, i64::from(imm));
    }

    #[test]
    fn b_type_immediate(imm in -2048i32..2048) {
        let offset = imm * 2;
        let d = decode(insn().beq(1, 2, offset).build());
        prop_assert_eq!(d.opcode, OP_BRANCH);
        prop_assert_eq!(d.imm, i64::from(offset));
    }

    #[test]
    fn j_type_immediate(imm in -(1i32 << 19)..(1i32 << 19)) {
        let offset = imm * 2;
        let d = decode(insn().jal(1, offset).build());
        prop_assert_eq!(d.opcode, OP_JAL);
        prop_assert_eq!(d.imm, i64::from(offset));
    }

    #[test]
    fn u_type_immediate_is_shifted(imm in 0i32..(1 << 20)) {
        let d = decode(insn().lui(3, imm).build());
        prop_assert_eq!(d.opcode, OP_LUI);
        prop_assert_eq!(d.imm, i64::from(((imm as u32) << 12) as i32));
    }
}

#[test]
fn bit_accessors_agree_with_decode() {
    let word = insn().add(5, 6, 7).build();
    assert_eq!(word.opcode(), decode(word).opcode);
    assert_eq!(word.rd(), 5);
    assert_eq!(word.rs1(), 6);
    assert_eq!(word.rs2(), 7);
}

#[test]
fn shift_fields_split_funct6_and_shamt() {
    let word = insn().srai(1, 2, 63).build();
    assert_eq!(word.funct6(), 0b01_0000);
    assert_eq!(word.shamt(), 63);
    assert_eq!(insn().slli(1, 2, 32).build().shamt(), 32);
}
