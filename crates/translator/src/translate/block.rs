//! Translation block descriptor.

use std::fmt;

use crate::common::constants::PAGE_MASK;
use crate::common::VirtAddr;
use crate::core::arch::mode::PrivilegeMode;
use crate::ir::op::IrOp;
use crate::translate::context::{BlockState, CompileFlags};

/// Debug settings a block was built under.
///
/// Dispatchers sharing a cache may run with different settings; a cached block
/// is only reused by one whose settings would build the same block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DebugKey {
    /// Built for single-stepping.
    pub singlestep: bool,
    /// Built in one-instruction-per-block mode.
    pub force_single_insn: bool,
    /// Breakpoint the block stops at, if one fell inside its span.
    pub breakpoint: Option<VirtAddr>,
}

/// A fully built translation block.
///
/// `size` is the guest byte span `[pc, pc + size)` the block was translated from
/// and is always a positive multiple of the instruction width. Blocks are
/// immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslationBlock {
    pc: VirtAddr,
    size: u64,
    icount: u32,
    cflags: CompileFlags,
    mem_mode: PrivilegeMode,
    end_state: BlockState,
    debug: DebugKey,
    ops: Vec<IrOp>,
}

impl TranslationBlock {
    pub(crate) const fn new(
        pc: VirtAddr,
        size: u64,
        icount: u32,
        cflags: CompileFlags,
        mem_mode: PrivilegeMode,
        end_state: BlockState,
        ops: Vec<IrOp>,
    ) -> Self {
        Self {
            pc,
            size,
            icount,
            cflags,
            mem_mode,
            end_state,
            debug: DebugKey {
                singlestep: false,
                force_single_insn: false,
                breakpoint: None,
            },
            ops,
        }
    }

    pub(crate) const fn with_debug(mut self, debug: DebugKey) -> Self {
        self.debug = debug;
        self
    }

    /// Guest address of the first instruction.
    pub const fn pc(&self) -> VirtAddr {
        self.pc
    }

    /// Guest byte length covered by the block.
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Number of guest instructions translated.
    pub const fn icount(&self) -> u32 {
        self.icount
    }

    /// Compile flags the block was built with.
    pub const fn cflags(&self) -> CompileFlags {
        self.cflags
    }

    /// Privilege the block's accesses are checked against.
    pub const fn mem_mode(&self) -> PrivilegeMode {
        self.mem_mode
    }

    /// Termination state the decode loop ended in.
    pub const fn end_state(&self) -> BlockState {
        self.end_state
    }

    /// Debug settings the block was built under.
    pub const fn debug_key(&self) -> DebugKey {
        self.debug
    }

    /// Emitted IR.
    pub fn ops(&self) -> &[IrOp] {
        &self.ops
    }

    /// First address past the block.
    pub const fn end(&self) -> VirtAddr {
        VirtAddr::new(self.pc.val().wrapping_add(self.size))
    }

    /// Returns `true` when `addr` lies within `[pc, pc + size)`.
    pub const fn contains(&self, addr: VirtAddr) -> bool {
        addr.val().wrapping_sub(self.pc.val()) < self.size
    }

    /// Returns `true` when the block's span intersects `[addr, addr + len)`.
    pub const fn overlaps(&self, addr: u64, len: u64) -> bool {
        let end = self.pc.val().saturating_add(self.size);
        addr < end && self.pc.val() < addr.saturating_add(len)
    }

    /// Page base addresses of the first and last byte of the block.
    pub const fn page_span(&self) -> (u64, u64) {
        let last = self.pc.val().wrapping_add(self.size.saturating_sub(1));
        (self.pc.val() & PAGE_MASK, last & PAGE_MASK)
    }

    /// Guest PC of the instruction that op `op_index` belongs to.
    ///
    /// Walks back to the nearest instruction-start marker; `None` for ops emitted
    /// before the first instruction.
    pub fn restore_pc(&self, op_index: usize) -> Option<VirtAddr> {
        self.ops
            .get(..=op_index.min(self.ops.len().saturating_sub(1)))?
            .iter()
            .rev()
            .find_map(|op| match op {
                IrOp::InsnStart { pc } => Some(VirtAddr::new(*pc)),
                _ => None,
            })
    }
}

impl fmt::Display for TranslationBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "TB {} size={} icount={} end={} cflags={:#x} mode={}",
            self.pc,
            self.size,
            self.icount,
            self.end_state,
            self.cflags.bits(),
            self.mem_mode
        )?;
        for op in &self.ops {
            writeln!(f, "  {op}")?;
        }
        Ok(())
    }
}
