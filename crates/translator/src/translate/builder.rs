//! The translation-block builder.
//!
//! [`translate_block`] runs the decode loop: for each guest instruction it emits
//! an instruction-start marker, checks breakpoints, fetches and decodes, then
//! evaluates the termination predicates in a fixed order:
//!
//! 1. single-step is active
//! 2. the PC left the start page
//! 3. the IR buffer is full
//! 4. the instruction budget is spent
//! 5. the global one-instruction mode is on
//!
//! The loop never fails. Fetch faults and illegal encodings become trap ops in
//! the block, so the caller always gets a complete, runnable block back.

use std::fmt;

use tracing::{debug, trace};

use crate::common::VirtAddr;
use crate::core::arch::mode::PrivilegeMode;
use crate::core::cpu::CpuState;
use crate::debug::BreakpointQuery;
use crate::ir::buffer::IrBuffer;
use crate::ir::op::{IrOp, Operand};
use crate::isa::decoder::{DecodeOutcome, InstructionDecoder};
use crate::isa::privileged::cause::exception;
use crate::memory::CodeFetch;
use crate::translate::block::{DebugKey, TranslationBlock};
use crate::translate::context::{BlockState, CompileFlags, TranslationContext};
use crate::translate::exit::{gen_block_exit, gen_debug, gen_exception_with_tval};

/// Collaborators of a block build.
pub struct TranslationEnv<'a> {
    /// Instruction memory.
    pub fetch: &'a dyn CodeFetch,
    /// Per-instruction decoder.
    pub decoder: &'a dyn InstructionDecoder,
    /// Breakpoints, frozen for this build.
    pub breakpoints: &'a dyn BreakpointQuery,
    /// Global one-instruction-per-block mode.
    pub force_single_insn: bool,
    /// IR buffer capacity in ops.
    pub op_buffer_capacity: usize,
}

impl fmt::Debug for TranslationEnv<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationEnv")
            .field("force_single_insn", &self.force_single_insn)
            .field("op_buffer_capacity", &self.op_buffer_capacity)
            .finish_non_exhaustive()
    }
}

/// Parameters of one block build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockRequest {
    /// Guest address to translate from.
    pub pc: VirtAddr,
    /// Compile flags (instruction budget, last-I/O marker).
    pub cflags: CompileFlags,
    /// Privilege used for fetches.
    pub mem_mode: PrivilegeMode,
    /// Build for single-stepping.
    pub singlestep: bool,
}

impl BlockRequest {
    /// Request for `pc` with an unbounded budget, in `mem_mode`, without single-step.
    pub const fn new(pc: VirtAddr, mem_mode: PrivilegeMode) -> Self {
        Self {
            pc,
            cflags: CompileFlags::with_count(0),
            mem_mode,
            singlestep: false,
        }
    }
}

/// Translates the guest instructions starting at `req.pc` into one block.
pub fn translate_block(
    cpu: &CpuState,
    env: &TranslationEnv<'_>,
    req: &BlockRequest,
) -> TranslationBlock {
    let mut ctx = TranslationContext::new(req.pc, req.cflags, req.mem_mode, req.singlestep);
    let mut ir = IrBuffer::new(env.op_buffer_capacity);
    ir.push(IrOp::BlockStart { pc: req.pc.val() });

    let mut breakpoint = None;
    while ctx.state() == BlockState::Open {
        ir.push(IrOp::InsnStart { pc: ctx.pc().val() });

        if env.breakpoints.is_breakpoint_at(ctx.pc()) {
            trace!(pc = %ctx.pc(), "breakpoint");
            ir.set_pc(ctx.pc().val());
            gen_debug(&mut ir);
            ctx.set_state(BlockState::Branch);
            // The breakpoint address must fall inside [pc, pc + size) so that
            // removing it invalidates this block.
            breakpoint = Some(ctx.pc());
            ctx.skip_insn();
            break;
        }

        if ctx.num_insns() + 1 == ctx.max_insns() && ctx.cflags().last_io() {
            ir.push(IrOp::IoStart);
        }

        match env.fetch.fetch_instruction(ctx.pc(), ctx.mem_mode()) {
            Ok(insn) => {
                trace!(pc = %ctx.pc(), insn = format_args!("{insn:08x}"), "decode");
                if env.decoder.decode_one(cpu, &mut ctx, &mut ir, insn) == DecodeOutcome::Illegal {
                    gen_exception_with_tval(
                        &ctx,
                        &mut ir,
                        exception::ILLEGAL_INSTRUCTION,
                        Operand::Const(u64::from(insn)),
                    );
                    ctx.set_state(BlockState::Stop);
                }
            }
            Err(fault) => {
                trace!(pc = %ctx.pc(), %fault, "fetch fault");
                gen_exception_with_tval(
                    &ctx,
                    &mut ir,
                    fault.fetch_cause(),
                    Operand::Const(fault.addr()),
                );
                ctx.set_state(BlockState::Stop);
            }
        }

        ctx.advance();

        if ctx.singlestep()
            || !ctx.pc().same_page(ctx.base_pc())
            || ir.is_full()
            || ctx.num_insns() >= ctx.max_insns()
            || env.force_single_insn
        {
            break;
        }
    }

    if breakpoint.is_none() {
        if ctx.cflags().last_io() {
            ir.push(IrOp::IoEnd);
        }
        gen_block_exit(&ctx, &mut ir);
    }

    ir.push(IrOp::BlockEnd {
        icount: ctx.num_insns(),
    });

    let block = TranslationBlock::new(
        ctx.base_pc(),
        ctx.span(),
        ctx.num_insns(),
        ctx.cflags(),
        ctx.mem_mode(),
        ctx.state(),
        ir.into_ops(),
    )
    .with_debug(DebugKey {
        singlestep: ctx.singlestep(),
        force_single_insn: env.force_single_insn,
        breakpoint,
    });
    debug!(
        pc = %block.pc(),
        size = block.size(),
        icount = block.icount(),
        end = %block.end_state(),
        ops = block.ops().len(),
        "translated block"
    );
    block
}
