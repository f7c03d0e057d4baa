//! # RV64I Execution Tests
//!
//! Builds single-instruction (or short) blocks and runs them through the
//! reference executor, checking architectural results.

use rstest::rstest;
use rvdbt_core::ir::BlockExit;
use rvdbt_core::isa::cause::exception;

use crate::common::builder::instruction::{InstructionBuilder, insn};
use crate::common::harness::{BASE, TestContext};

fn run_one(word: u32, x1: u64, x2: u64) -> TestContext {
    let mut tc = TestContext::new().load_program(BASE, &[word]);
    tc.set_reg(1, x1);
    tc.set_reg(2, x2);
    let tb = tc.build_here(1);
    assert_eq!(tc.run(&tb), BlockExit::Dispatch);
    assert_eq!(tc.pc(), BASE + 4);
    tc
}

#[rstest]
#[case::add(insn().add(3, 1, 2), 5, 7, 12)]
#[case::sub(insn().sub(3, 1, 2), 5, 7, (-2i64) as u64)]
#[case::sltu(insn().sltu(3, 1, 2), 5, 7, 1)]
#[case::sra(insn().sra(3, 1, 2), 0x8000_0000_0000_0000, 4, 0xF800_0000_0000_0000)]
#[case::addw_wraps(insn().addw(3, 1, 2), 0x7FFF_FFFF, 1, 0xFFFF_FFFF_8000_0000)]
#[case::subw(insn().subw(3, 1, 2), 0, 1, u64::MAX)]
#[case::sraw(insn().sraw(3, 1, 2), 0x8000_0000, 31, u64::MAX)]
#[case::addi_negative(insn().addi(3, 1, -1), 0, 0, u64::MAX)]
#[case::slti(insn().slti(3, 1, 0), u64::MAX, 0, 1)]
#[case::andi(insn().andi(3, 1, 0xF0), 0xABCD, 0, 0xC0)]
#[case::slli(insn().slli(3, 1, 63), 1, 0, 1 << 63)]
#[case::srli(insn().srli(3, 1, 60), u64::MAX, 0, 0xF)]
#[case::srai(insn().srai(3, 1, 60), 0x8000_0000_0000_0000, 0, u64::MAX)]
#[case::addiw(insn().addiw(3, 1, 1), 0x7FFF_FFFF, 0, 0xFFFF_FFFF_8000_0000)]
#[case::sraiw(insn().sraiw(3, 1, 4), 0x8000_0000, 0, 0xFFFF_FFFF_F800_0000)]
#[case::lui(insn().lui(3, 0x80000), 0, 0, 0xFFFF_FFFF_8000_0000)]
#[case::auipc(insn().auipc(3, 1), 0, 0, BASE + 0x1000)]
fn alu_results(#[case] op: InstructionBuilder, #[case] x1: u64, #[case] x2: u64, #[case] expected: u64) {
    let tc = run_one(op.build(), x1, x2);
    assert_eq!(tc.get_reg(3), expected);
}

#[test]
fn loads_extend_by_width() {
    let data = BASE + 0x100;
    let mut tc = TestContext::new().load_program(
        BASE,
        &[
            insn().sd(1, 2, 8).build(),
            insn().ld(3, 1, 8).build(),
            insn().lb(4, 1, 8).build(),
            insn().lbu(5, 1, 8).build(),
            insn().sw(1, 6, 16).build(),
            insn().lw(7, 1, 16).build(),
        ],
    );
    tc.set_reg(1, data);
    tc.set_reg(2, 0xFF);
    tc.set_reg(6, 0x8000_0000);

    let tb = tc.build_here(6);
    assert_eq!(tc.run(&tb), BlockExit::Dispatch);
    assert_eq!(tc.get_reg(3), 0xFF);
    assert_eq!(tc.get_reg(4), u64::MAX);
    assert_eq!(tc.get_reg(5), 0xFF);
    assert_eq!(tc.get_reg(7), 0xFFFF_FFFF_8000_0000);
    assert_eq!(tc.memory.read_bytes(data + 8, 2).unwrap(), vec![0xFF, 0x00]);
}

#[rstest]
#[case::beq_taken(insn().beq(1, 2, 16), 3, 3, BlockExit::Link { slot: 0 }, 16)]
#[case::beq_not_taken(insn().beq(1, 2, 16), 3, 4, BlockExit::Link { slot: 1 }, 4)]
#[case::bne_taken(insn().bne(1, 2, -4), 3, 4, BlockExit::Link { slot: 0 }, -4)]
#[case::blt_signed(insn().blt(1, 2, 8), u64::MAX, 0, BlockExit::Link { slot: 0 }, 8)]
fn branch_outcomes(
    #[case] op: InstructionBuilder,
    #[case] x1: u64,
    #[case] x2: u64,
    #[case] exit: BlockExit,
    #[case] delta: i64,
) {
    let at = BASE + 0x800;
    let mut tc = TestContext::new().load_program(at, &[op.build()]);
    tc.set_reg(1, x1);
    tc.set_reg(2, x2);
    let tb = tc.build_here(0);
    assert_eq!(tc.run(&tb), exit);
    assert_eq!(tc.pc(), at.wrapping_add(delta as u64));
}

#[test]
fn jal_links_return_address() {
    let mut tc = TestContext::new().load_program(BASE, &[insn().jal(1, 0x20).build()]);
    let tb = tc.build_here(0);
    assert_eq!(tc.run(&tb), BlockExit::Link { slot: 0 });
    assert_eq!(tc.pc(), BASE + 0x20);
    assert_eq!(tc.get_reg(1), BASE + 4);
}

#[test]
fn jalr_clears_low_bit() {
    let mut tc = TestContext::new().load_program(BASE, &[insn().jalr(5, 1, 3).build()]);
    tc.set_reg(1, BASE + 0x101);
    let tb = tc.build_here(0);
    assert_eq!(tc.run(&tb), BlockExit::Dispatch);
    assert_eq!(tc.pc(), BASE + 0x104);
    assert_eq!(tc.get_reg(5), BASE + 4);
}

#[test]
fn jalr_to_misaligned_target_traps_before_linking() {
    let mut tc = TestContext::new().load_program(BASE, &[insn().jalr(5, 1, 0).build()]);
    tc.set_reg(1, BASE + 0x102);
    let tb = tc.build_here(0);
    assert_eq!(
        tc.run(&tb),
        BlockExit::Exception {
            code: exception::INSTRUCTION_ADDRESS_MISALIGNED,
            tval: BASE + 0x102,
        }
    );
    assert_eq!(tc.pc(), BASE);
    assert_eq!(tc.get_reg(5), 0);
}

#[test]
fn ecall_reports_machine_cause() {
    let mut tc = TestContext::new().load_program(BASE, &[insn().ecall().build()]);
    let tb = tc.build_here(0);
    assert_eq!(
        tc.run(&tb),
        BlockExit::Exception {
            code: exception::ENVIRONMENT_CALL_FROM_M_MODE,
            tval: 0,
        }
    );
    assert_eq!(tc.pc(), BASE);
}
