//! Decoder contract.
//!
//! The block builder knows nothing about instruction semantics. For every word it
//! fetches, it calls [`InstructionDecoder::decode_one`], which appends the IR for
//! that instruction and may end the block by moving the context state to
//! [`BlockState::Stop`](crate::translate::BlockState::Stop) or
//! [`BlockState::Branch`](crate::translate::BlockState::Branch).

use crate::core::cpu::CpuState;
use crate::ir::buffer::IrBuffer;
use crate::translate::context::TranslationContext;

/// Result of decoding one instruction word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecodeOutcome {
    /// IR for the instruction was appended.
    Emitted,
    /// The encoding is not recognised; nothing was appended.
    Illegal,
}

/// Translates single guest instructions into IR.
pub trait InstructionDecoder {
    /// Emits IR for `insn`, located at `ctx.pc()`.
    ///
    /// Implementations must not append more than
    /// [`MAX_OPS_PER_INSN`](crate::common::constants::MAX_OPS_PER_INSN) ops.
    /// A decoder that moves the state to `Stop` must first write the PC the
    /// guest resumes at: a single-stepped block raises its debug trap without
    /// writing the PC itself.
    fn decode_one(
        &self,
        cpu: &CpuState,
        ctx: &mut TranslationContext,
        ir: &mut IrBuffer,
        insn: u32,
    ) -> DecodeOutcome;
}
