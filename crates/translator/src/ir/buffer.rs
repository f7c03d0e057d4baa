//! IR emission buffer.
//!
//! The builder and decoders append ops here; nothing reads them back until the
//! block is finalized. Capacity is expressed in ops: the buffer reports itself
//! full once fewer than [`MAX_OPS_PER_INSN`] slots remain, so one more
//! instruction can always be emitted after a negative check.

use crate::common::constants::{DEFAULT_OP_BUFFER_CAPACITY, MAX_OPS_PER_INSN};
use crate::ir::op::{IrOp, Label, Operand, Place, Temp};

/// Append-only IR buffer with a soft capacity.
#[derive(Clone, Debug)]
pub struct IrBuffer {
    ops: Vec<IrOp>,
    capacity: usize,
    next_temp: u32,
    next_label: u32,
}

impl Default for IrBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_OP_BUFFER_CAPACITY)
    }
}

impl IrBuffer {
    /// Creates an empty buffer holding up to `capacity` ops.
    pub fn new(capacity: usize) -> Self {
        Self {
            ops: Vec::with_capacity(capacity),
            capacity,
            next_temp: 0,
            next_label: 0,
        }
    }

    /// Appends one op.
    #[inline]
    pub fn push(&mut self, op: IrOp) {
        self.ops.push(op);
    }

    /// Number of ops emitted so far.
    pub const fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` when nothing has been emitted.
    pub const fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Configured capacity in ops.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` when the worst-case expansion of one more instruction
    /// would not fit.
    pub const fn is_full(&self) -> bool {
        self.ops.len() + MAX_OPS_PER_INSN >= self.capacity
    }

    /// Allocates a fresh temporary.
    pub const fn new_temp(&mut self) -> Temp {
        let t = Temp(self.next_temp);
        self.next_temp += 1;
        t
    }

    /// Allocates a fresh label.
    pub const fn new_label(&mut self) -> Label {
        let l = Label(self.next_label);
        self.next_label += 1;
        l
    }

    /// Operand reading guest register `reg`; `x0` reads as the constant zero.
    pub const fn gpr(reg: usize) -> Operand {
        if reg == 0 {
            Operand::Const(0)
        } else {
            Operand::Place(Place::Gpr(reg))
        }
    }

    /// Emits `x[reg] = src`; writes to `x0` are dropped.
    pub fn set_gpr(&mut self, reg: usize, src: impl Into<Operand>) {
        if reg != 0 {
            self.push(IrOp::Mov {
                dst: Place::Gpr(reg),
                src: src.into(),
            });
        }
    }

    /// Emits `pc = src`.
    pub fn set_pc(&mut self, src: impl Into<Operand>) {
        self.push(IrOp::Mov {
            dst: Place::Pc,
            src: src.into(),
        });
    }

    /// Emitted ops, in order.
    pub fn ops(&self) -> &[IrOp] {
        &self.ops
    }

    /// Consumes the buffer, returning the emitted ops.
    pub fn into_ops(self) -> Vec<IrOp> {
        self.ops
    }
}
