//! # Block Invariant Properties
//!
//! Randomized checks of the invariants every built block must satisfy,
//! whatever its start address, budget, or contents.

use proptest::prelude::*;
use rvdbt_core::common::constants::MAX_INSNS_PER_BLOCK;
use rvdbt_core::common::{PAGE_SIZE, VirtAddr};
use rvdbt_core::ir::BlockExit;
use rvdbt_core::translate::CompileFlags;

use crate::common::builder::instruction::insn;
use crate::common::harness::{BASE, RAM_SIZE, TestContext};

fn nop_context_at(offset: u64) -> TestContext {
    let mut tc = TestContext::new().fill_with_nops();
    tc.cpu.set_pc(VirtAddr::new(BASE + offset));
    tc
}

/// An instruction whose destination is `x0`, with arbitrary sources and immediate.
fn x0_writer() -> impl Strategy<Value = u32> {
    (0u8..8, 0u32..32, 0u32..32, -2048i32..2048).prop_map(|(kind, rs1, rs2, imm)| match kind {
        0 => insn().addi(0, rs1, imm).build(),
        1 => insn().lui(0, imm).build(),
        2 => insn().auipc(0, imm).build(),
        3 => insn().add(0, rs1, rs2).build(),
        4 => insn().sltu(0, rs1, rs2).build(),
        5 => insn().addiw(0, rs1, imm).build(),
        6 => insn().sraiw(0, rs1, rs2).build(),
        _ => insn().subw(0, rs1, rs2).build(),
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn size_and_end_follow_icount(slot in 0u64..(RAM_SIZE / 4), count in 0u32..64) {
        let tc = nop_context_at(slot * 4);
        let tb = tc.build_here(count);

        prop_assert_eq!(tb.size(), u64::from(tb.icount()) * 4);
        prop_assert_eq!(tb.end().val(), tb.pc().val() + tb.size());
        prop_assert!(tb.icount() >= 1);
    }

    #[test]
    fn never_leaves_start_page(slot in 0u64..(RAM_SIZE / 4)) {
        let tc = nop_context_at(slot * 4);
        let tb = tc.build_here(0);
        let last = VirtAddr::new(tb.end().val() - 4);

        prop_assert!(last.same_page(tb.pc()));
        prop_assert!(tb.size() <= PAGE_SIZE);
    }

    #[test]
    fn icount_respects_budget(count in 0u32..0x8000, last_io in any::<bool>()) {
        let tc = nop_context_at(0);
        let mut req = tc.request(count);
        if last_io {
            req.cflags = CompileFlags::with_count(count).with_last_io();
        }
        let tb = tc.build(&req);

        prop_assert!(tb.icount() <= req.cflags.max_insns());
        prop_assert!(tb.icount() <= MAX_INSNS_PER_BLOCK);
        if count != 0 && count <= MAX_INSNS_PER_BLOCK {
            prop_assert_eq!(tb.icount(), count);
        }
    }

    #[test]
    fn ir_stays_within_capacity(capacity in 40usize..700) {
        let tc = TestContext::new().fill_with_nops().with_op_buffer_capacity(capacity);
        let tb = tc.build_here(0);

        prop_assert!(tb.ops().len() <= capacity);
    }

    #[test]
    fn x0_reads_zero_after_any_block(
        program in prop::collection::vec(x0_writer(), 1..12),
        seeds in prop::collection::vec(any::<u64>(), 31),
    ) {
        let mut tc = TestContext::new().load_program(BASE, &program);
        for (reg, val) in seeds.into_iter().enumerate() {
            tc.set_reg(reg + 1, val);
        }
        let tb = tc.build_here(u32::try_from(program.len()).unwrap());

        prop_assert_eq!(tc.run(&tb), BlockExit::Dispatch);
        prop_assert_eq!(tc.get_reg(0), 0);
        prop_assert_eq!(tb.icount() as usize, program.len());
    }
}
