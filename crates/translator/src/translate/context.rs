//! Per-block translation state.
//!
//! A [`TranslationContext`] lives for exactly one block build and is passed by
//! `&mut` to the decoder for every instruction. The decoder may only move the
//! [`BlockState`] away from [`BlockState::Open`]; the program counter and the
//! instruction count are advanced by the builder alone.

use std::fmt;

use crate::common::constants::{CF_COUNT_MASK, INSTRUCTION_WIDTH, MAX_INSNS_PER_BLOCK};
use crate::common::VirtAddr;
use crate::core::arch::mode::PrivilegeMode;

/// Why the decode loop stops (or `Open` while it may continue).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BlockState {
    /// Keep decoding; if the loop ends for budget reasons the block falls through.
    #[default]
    Open,
    /// Stop after this instruction and continue at the next PC (e.g. after a trap
    /// or an instruction-stream fence).
    Stop,
    /// The instruction emitted its own exit sequence.
    Branch,
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Stop => "stop",
            Self::Branch => "branch",
        })
    }
}

/// Compile flags of a block: an instruction budget plus the last-I/O marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct CompileFlags(u32);

impl CompileFlags {
    /// The last instruction of the block may perform I/O.
    pub const LAST_IO: u32 = 0x8000;

    /// Flags with an instruction budget of `count` (0 means no explicit budget).
    pub const fn with_count(count: u32) -> Self {
        Self(count & CF_COUNT_MASK)
    }

    /// Rebuilds flags from their raw encoding.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & (CF_COUNT_MASK | Self::LAST_IO))
    }

    /// Raw encoding.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Sets the last-I/O marker.
    pub const fn with_last_io(self) -> Self {
        Self(self.0 | Self::LAST_IO)
    }

    /// Instruction budget field.
    pub const fn count(self) -> u32 {
        self.0 & CF_COUNT_MASK
    }

    /// Returns `true` when the last-I/O marker is set.
    pub const fn last_io(self) -> bool {
        self.0 & Self::LAST_IO != 0
    }

    /// Effective instruction limit: the budget, with 0 meaning [`CF_COUNT_MASK`],
    /// clamped to [`MAX_INSNS_PER_BLOCK`].
    pub const fn max_insns(self) -> u32 {
        let count = match self.count() {
            0 => CF_COUNT_MASK,
            n => n,
        };
        if count > MAX_INSNS_PER_BLOCK {
            MAX_INSNS_PER_BLOCK
        } else {
            count
        }
    }
}

/// Mutable state of one block build.
#[derive(Clone, Debug)]
pub struct TranslationContext {
    base_pc: VirtAddr,
    pc: VirtAddr,
    num_insns: u32,
    max_insns: u32,
    state: BlockState,
    mem_mode: PrivilegeMode,
    singlestep: bool,
    cflags: CompileFlags,
}

impl TranslationContext {
    /// Opens a context at `pc`.
    pub const fn new(
        pc: VirtAddr,
        cflags: CompileFlags,
        mem_mode: PrivilegeMode,
        singlestep: bool,
    ) -> Self {
        Self {
            base_pc: pc,
            pc,
            num_insns: 0,
            max_insns: cflags.max_insns(),
            state: BlockState::Open,
            mem_mode,
            singlestep,
            cflags,
        }
    }

    /// Address of the first instruction of the block.
    pub const fn base_pc(&self) -> VirtAddr {
        self.base_pc
    }

    /// Address of the instruction being translated.
    pub const fn pc(&self) -> VirtAddr {
        self.pc
    }

    /// Address of the instruction following the current one.
    pub const fn next_pc(&self) -> VirtAddr {
        VirtAddr::new(self.pc.val().wrapping_add(INSTRUCTION_WIDTH))
    }

    /// Instructions translated so far.
    pub const fn num_insns(&self) -> u32 {
        self.num_insns
    }

    /// Instruction limit of this block.
    pub const fn max_insns(&self) -> u32 {
        self.max_insns
    }

    /// Current termination state.
    pub const fn state(&self) -> BlockState {
        self.state
    }

    /// Sets the termination state.
    pub const fn set_state(&mut self, state: BlockState) {
        self.state = state;
    }

    /// Privilege used to validate fetches and data accesses of this block.
    pub const fn mem_mode(&self) -> PrivilegeMode {
        self.mem_mode
    }

    /// Whether the block is built for single-stepping.
    pub const fn singlestep(&self) -> bool {
        self.singlestep
    }

    /// Compile flags of the block.
    pub const fn cflags(&self) -> CompileFlags {
        self.cflags
    }

    /// Moves past the current instruction: `pc += 4`, `num_insns += 1`.
    pub(crate) const fn advance(&mut self) {
        self.skip_insn();
        self.num_insns += 1;
    }

    /// Moves `pc` past the current instruction without counting it.
    pub(crate) const fn skip_insn(&mut self) {
        self.pc = self.next_pc();
    }

    /// Byte length covered so far.
    pub const fn span(&self) -> u64 {
        self.pc.val().wrapping_sub(self.base_pc.val())
    }
}
