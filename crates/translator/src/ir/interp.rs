//! Reference IR executor.
//!
//! Runs one translated block against a [`CpuState`] and a [`GuestBus`]. Execution
//! is straight-line except for forward label jumps; it stops at the first
//! [`IrOp::ExitTb`] or [`IrOp::RaiseException`].
//!
//! A memory fault inside the block restores the PC of the faulting instruction
//! from its instruction-start marker before reporting the exception, so the
//! guest sees a precise trap.

use tracing::trace;

use crate::common::VirtAddr;
use crate::core::cpu::CpuState;
use crate::ir::op::{IrOp, Label, MemWidth, Operand, Place, TbExit};
use crate::isa::privileged::cause::EXCP_DEBUG;
use crate::memory::GuestBus;
use crate::translate::block::TranslationBlock;

/// How execution of a block ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockExit {
    /// Returned to the dispatcher; the next block is found by PC.
    Dispatch,
    /// Left through an unpatched jump slot; the dispatcher may link it.
    Link {
        /// Jump slot index.
        slot: usize,
    },
    /// Left through a jump slot that is already linked.
    Linked {
        /// Jump slot index.
        slot: usize,
    },
    /// A guest exception was raised.
    Exception {
        /// Cause code.
        code: u64,
        /// Trap value.
        tval: u64,
    },
    /// A debug stop was raised (breakpoint or single-step).
    Debug,
}

struct Frame<'a> {
    cpu: &'a mut CpuState,
    temps: Vec<u64>,
}

impl Frame<'_> {
    fn read(&self, operand: Operand) -> u64 {
        match operand {
            Operand::Const(c) => c,
            Operand::Place(Place::Gpr(r)) => self.cpu.read_register(r),
            Operand::Place(Place::Pc) => self.cpu.pc().val(),
            Operand::Place(Place::LoadRes) => self.cpu.load_res.unwrap_or(u64::MAX),
            Operand::Place(Place::Temp(t)) => self.temps.get(t.0 as usize).copied().unwrap_or(0),
        }
    }

    fn write(&mut self, place: Place, val: u64) {
        match place {
            Place::Gpr(r) => self.cpu.write_register(r, val),
            Place::Pc => self.cpu.set_pc(VirtAddr::new(val)),
            Place::LoadRes => self.cpu.load_res = Some(val),
            Place::Temp(t) => {
                let idx = t.0 as usize;
                if idx >= self.temps.len() {
                    self.temps.resize(idx + 1, 0);
                }
                self.temps[idx] = val;
            }
        }
    }
}

fn label_position(ops: &[IrOp], label: Label) -> Option<usize> {
    ops.iter().position(|op| *op == IrOp::SetLabel(label))
}

const fn sign_extend(val: u64, width: MemWidth) -> u64 {
    match width {
        MemWidth::Byte => val as u8 as i8 as i64 as u64,
        MemWidth::Half => val as u16 as i16 as i64 as u64,
        MemWidth::Word => val as u32 as i32 as i64 as u64,
        MemWidth::Double => val,
    }
}

/// Executes `block` until it leaves.
///
/// `linked(slot)` tells whether jump slot `slot` of this block currently points at a
/// valid successor; a [`IrOp::GotoTb`] on a linked slot turns the following
/// [`TbExit::Link`] into [`BlockExit::Linked`].
pub fn execute<B, L>(
    block: &TranslationBlock,
    cpu: &mut CpuState,
    bus: &mut B,
    linked: L,
) -> BlockExit
where
    B: GuestBus + ?Sized,
    L: Fn(usize) -> bool,
{
    let ops = block.ops();
    let mode = block.mem_mode();
    let mut frame = Frame {
        cpu,
        temps: Vec::new(),
    };
    let mut chained: Option<usize> = None;
    let mut idx = 0;

    while let Some(op) = ops.get(idx) {
        idx += 1;
        match op {
            IrOp::BlockStart { .. }
            | IrOp::InsnStart { .. }
            | IrOp::SetLabel(_)
            | IrOp::IoStart
            | IrOp::IoEnd
            | IrOp::BlockEnd { .. } => {}
            IrOp::Mov { dst, src } => {
                let v = frame.read(*src);
                frame.write(*dst, v);
            }
            IrOp::Binary { op, dst, a, b } => {
                let v = op.apply(frame.read(*a), frame.read(*b));
                frame.write(*dst, v);
            }
            IrOp::Brcond { cond, a, b, target } => {
                if cond.holds(frame.read(*a), frame.read(*b)) {
                    match label_position(ops, *target) {
                        Some(pos) => idx = pos,
                        None => return BlockExit::Dispatch,
                    }
                }
            }
            IrOp::Load {
                width,
                signed,
                dst,
                base,
                offset,
            } => {
                let addr = VirtAddr::new(frame.read(*base).wrapping_add(*offset as u64));
                match bus.load(addr, *width, mode) {
                    Ok(raw) => {
                        let v = if *signed { sign_extend(raw, *width) } else { raw };
                        frame.write(*dst, v);
                    }
                    Err(fault) => {
                        restore(block, frame.cpu, idx - 1);
                        return BlockExit::Exception {
                            code: fault.load_cause(),
                            tval: fault.addr(),
                        };
                    }
                }
            }
            IrOp::Store {
                width,
                src,
                base,
                offset,
            } => {
                let addr = VirtAddr::new(frame.read(*base).wrapping_add(*offset as u64));
                let v = frame.read(*src);
                if let Err(fault) = bus.store(addr, *width, v, mode) {
                    restore(block, frame.cpu, idx - 1);
                    return BlockExit::Exception {
                        code: fault.store_cause(),
                        tval: fault.addr(),
                    };
                }
            }
            IrOp::RaiseException { code, tval } => {
                if *code == EXCP_DEBUG {
                    return BlockExit::Debug;
                }
                return BlockExit::Exception {
                    code: *code,
                    tval: frame.read(*tval),
                };
            }
            IrOp::GotoTb { slot } => {
                if linked(*slot) {
                    chained = Some(*slot);
                }
            }
            IrOp::ExitTb(TbExit::Dispatch) => return BlockExit::Dispatch,
            IrOp::ExitTb(TbExit::Link { slot }) => {
                return if chained == Some(*slot) {
                    BlockExit::Linked { slot: *slot }
                } else {
                    BlockExit::Link { slot: *slot }
                };
            }
        }
    }

    BlockExit::Dispatch
}

fn restore(block: &TranslationBlock, cpu: &mut CpuState, op_index: usize) {
    if let Some(pc) = block.restore_pc(op_index) {
        trace!(%pc, "restoring pc after memory fault");
        cpu.set_pc(pc);
    }
}
