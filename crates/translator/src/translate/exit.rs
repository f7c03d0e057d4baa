//! Block exit and chaining.
//!
//! Decides how control leaves a block: a patchable jump into a successor block
//! (chaining), a plain return to the dispatcher, or a trap. Chaining is only
//! allowed to targets on the block's own start page, and never while
//! single-stepping, so that invalidating a page always unlinks every jump into it.

use tracing::trace;

use crate::common::VirtAddr;
use crate::ir::buffer::IrBuffer;
use crate::ir::op::{IrOp, Operand, TbExit};
use crate::isa::privileged::cause::EXCP_DEBUG;
use crate::translate::context::{BlockState, TranslationContext};

/// Returns `true` when a jump to `dest` may be chained.
pub const fn use_goto_tb(ctx: &TranslationContext, dest: VirtAddr) -> bool {
    !ctx.singlestep() && ctx.base_pc().same_page(dest)
}

/// Emits a jump to `dest` through jump slot `slot`.
///
/// Chainable targets get `goto_tb slot; pc = dest; exit_tb link(slot)`. Anything
/// else writes the PC, raises a debug trap when single-stepping, and returns to
/// the dispatcher.
pub fn gen_goto_tb(ctx: &TranslationContext, ir: &mut IrBuffer, slot: usize, dest: VirtAddr) {
    if use_goto_tb(ctx, dest) {
        trace!(%dest, slot, "chained exit");
        ir.push(IrOp::GotoTb { slot });
        ir.set_pc(dest.val());
        ir.push(IrOp::ExitTb(TbExit::Link { slot }));
    } else {
        trace!(%dest, slot, singlestep = ctx.singlestep(), "unchained exit");
        ir.set_pc(dest.val());
        if ctx.singlestep() {
            gen_debug(ir);
        }
        ir.push(IrOp::ExitTb(TbExit::Dispatch));
    }
}

/// Emits a debug trap at the current guest PC.
pub fn gen_debug(ir: &mut IrBuffer) {
    ir.push(IrOp::RaiseException {
        code: EXCP_DEBUG,
        tval: Operand::Const(0),
    });
}

/// Writes the live PC and raises exception `code` with a zero trap value.
pub fn gen_exception(ctx: &TranslationContext, ir: &mut IrBuffer, code: u64) {
    gen_exception_with_tval(ctx, ir, code, Operand::Const(0));
}

/// Writes the live PC and raises exception `code` with the PC as trap value.
pub fn gen_exception_badaddr(ctx: &TranslationContext, ir: &mut IrBuffer, code: u64) {
    gen_exception_with_tval(ctx, ir, code, Operand::Const(ctx.pc().val()));
}

/// Writes the live PC and raises exception `code` with an explicit trap value.
pub fn gen_exception_with_tval(
    ctx: &TranslationContext,
    ir: &mut IrBuffer,
    code: u64,
    tval: Operand,
) {
    ir.set_pc(ctx.pc().val());
    ir.push(IrOp::RaiseException { code, tval });
}

/// Emits the epilogue chosen by the decode loop's final state.
pub fn gen_block_exit(ctx: &TranslationContext, ir: &mut IrBuffer) {
    let state = ctx.state();
    if ctx.singlestep() && state != BlockState::Branch {
        if state == BlockState::Open {
            ir.set_pc(ctx.pc().val());
        }
        gen_debug(ir);
        return;
    }
    match state {
        BlockState::Stop => gen_goto_tb(ctx, ir, 0, ctx.pc()),
        BlockState::Open => {
            // End of page or budget: fall through to the dispatcher, never chain.
            ir.set_pc(ctx.pc().val());
            ir.push(IrOp::ExitTb(TbExit::Dispatch));
        }
        BlockState::Branch => {}
    }
}
