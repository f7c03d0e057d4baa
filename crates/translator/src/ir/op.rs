//! IR operation definitions.
//!
//! The op set is deliberately small: guest registers and the PC are addressed as
//! [`Place`]s, intermediate values live in numbered [`Temp`]s, and control flow inside
//! a block is expressed with forward [`Label`]s. Block-level control transfer is
//! limited to [`IrOp::GotoTb`] and [`IrOp::ExitTb`].

use std::fmt;

/// A block-local temporary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Temp(pub u32);

/// A block-local branch target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Label(pub u32);

/// A writable storage location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Place {
    /// Guest integer register (never `x0`).
    Gpr(usize),
    /// Guest program counter.
    Pc,
    /// Guest load reservation address.
    LoadRes,
    /// Block-local temporary.
    Temp(Temp),
}

/// A source operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    /// The current content of a storage location.
    Place(Place),
    /// A constant.
    Const(u64),
}

impl From<Place> for Operand {
    fn from(place: Place) -> Self {
        Self::Place(place)
    }
}

impl From<Temp> for Operand {
    fn from(temp: Temp) -> Self {
        Self::Place(Place::Temp(temp))
    }
}

impl From<u64> for Operand {
    fn from(value: u64) -> Self {
        Self::Const(value)
    }
}

impl From<Temp> for Place {
    fn from(temp: Temp) -> Self {
        Self::Temp(temp)
    }
}

/// Two-operand arithmetic and logic.
///
/// The `W` forms operate on the low 32 bits and sign-extend the result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction.
    Sub,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Logical left shift by the low 6 bits of the second operand.
    Sll,
    /// Logical right shift by the low 6 bits of the second operand.
    Srl,
    /// Arithmetic right shift by the low 6 bits of the second operand.
    Sra,
    /// Signed less-than, producing 0 or 1.
    Slt,
    /// Unsigned less-than, producing 0 or 1.
    Sltu,
    /// 32-bit addition.
    AddW,
    /// 32-bit subtraction.
    SubW,
    /// 32-bit logical left shift.
    SllW,
    /// 32-bit logical right shift.
    SrlW,
    /// 32-bit arithmetic right shift.
    SraW,
}

impl BinOp {
    /// Applies the operation to two 64-bit values.
    pub const fn apply(self, a: u64, b: u64) -> u64 {
        match self {
            Self::Add => a.wrapping_add(b),
            Self::Sub => a.wrapping_sub(b),
            Self::And => a & b,
            Self::Or => a | b,
            Self::Xor => a ^ b,
            Self::Sll => a << (b & 0x3F),
            Self::Srl => a >> (b & 0x3F),
            Self::Sra => ((a as i64) >> (b & 0x3F)) as u64,
            Self::Slt => ((a as i64) < (b as i64)) as u64,
            Self::Sltu => (a < b) as u64,
            Self::AddW => sext32((a as u32).wrapping_add(b as u32)),
            Self::SubW => sext32((a as u32).wrapping_sub(b as u32)),
            Self::SllW => sext32((a as u32) << (b & 0x1F)),
            Self::SrlW => sext32((a as u32) >> (b & 0x1F)),
            Self::SraW => ((a as i32) >> (b & 0x1F)) as i64 as u64,
        }
    }

    const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Sll => "shl",
            Self::Srl => "shr",
            Self::Sra => "sar",
            Self::Slt => "setlt",
            Self::Sltu => "setltu",
            Self::AddW => "add32",
            Self::SubW => "sub32",
            Self::SllW => "shl32",
            Self::SrlW => "shr32",
            Self::SraW => "sar32",
        }
    }
}

const fn sext32(v: u32) -> u64 {
    v as i32 as i64 as u64
}

/// Comparison used by conditional branches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cond {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Signed less-than.
    Lt,
    /// Signed greater-or-equal.
    Ge,
    /// Unsigned less-than.
    Ltu,
    /// Unsigned greater-or-equal.
    Geu,
}

impl Cond {
    /// Evaluates the comparison.
    pub const fn holds(self, a: u64, b: u64) -> bool {
        match self {
            Self::Eq => a == b,
            Self::Ne => a != b,
            Self::Lt => (a as i64) < (b as i64),
            Self::Ge => (a as i64) >= (b as i64),
            Self::Ltu => a < b,
            Self::Geu => a >= b,
        }
    }
}

/// Memory access width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemWidth {
    /// 1 byte.
    Byte,
    /// 2 bytes.
    Half,
    /// 4 bytes.
    Word,
    /// 8 bytes.
    Double,
}

impl MemWidth {
    /// Width in bytes.
    pub const fn bytes(self) -> u64 {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
            Self::Double => 8,
        }
    }
}

/// How a block hands control back to the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TbExit {
    /// Plain return; the dispatcher looks the next block up by PC.
    Dispatch,
    /// Return through jump slot `slot`, asking the dispatcher to patch the slot.
    Link {
        /// Jump slot index.
        slot: usize,
    },
}

/// One IR operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IrOp {
    /// Block prologue.
    BlockStart {
        /// Guest address of the first instruction.
        pc: u64,
    },
    /// Marks the first op of a guest instruction; carries replay data.
    InsnStart {
        /// Guest address of the instruction.
        pc: u64,
    },
    /// `dst = src`.
    Mov {
        /// Destination.
        dst: Place,
        /// Source.
        src: Operand,
    },
    /// `dst = a <op> b`.
    Binary {
        /// Operation.
        op: BinOp,
        /// Destination.
        dst: Place,
        /// First operand.
        a: Operand,
        /// Second operand.
        b: Operand,
    },
    /// Jump forward to `target` when `a <cond> b` holds.
    Brcond {
        /// Comparison.
        cond: Cond,
        /// First operand.
        a: Operand,
        /// Second operand.
        b: Operand,
        /// Branch target.
        target: Label,
    },
    /// Defines a branch target.
    SetLabel(Label),
    /// `dst = mem[base + offset]`.
    Load {
        /// Access width.
        width: MemWidth,
        /// Sign-extend the loaded value.
        signed: bool,
        /// Destination.
        dst: Place,
        /// Base address.
        base: Operand,
        /// Signed displacement.
        offset: i64,
    },
    /// `mem[base + offset] = src`.
    Store {
        /// Access width.
        width: MemWidth,
        /// Value to store.
        src: Operand,
        /// Base address.
        base: Operand,
        /// Signed displacement.
        offset: i64,
    },
    /// Raises a guest exception; control never continues past this op.
    RaiseException {
        /// Cause code.
        code: u64,
        /// Trap value.
        tval: Operand,
    },
    /// Patchable direct jump to the block linked in `slot`.
    GotoTb {
        /// Jump slot index.
        slot: usize,
    },
    /// Leaves the block.
    ExitTb(TbExit),
    /// Start of an I/O-capable instruction.
    IoStart,
    /// End of the I/O window of the block.
    IoEnd,
    /// Block epilogue.
    BlockEnd {
        /// Number of guest instructions in the block.
        icount: u32,
    },
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpr(r) => write!(f, "{}", crate::isa::abi::gpr_name(*r)),
            Self::Pc => f.write_str("pc"),
            Self::LoadRes => f.write_str("load_res"),
            Self::Temp(t) => write!(f, "tmp{}", t.0),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Place(p) => write!(f, "{p}"),
            Self::Const(c) => write!(f, "$0x{c:x}"),
        }
    }
}

impl fmt::Display for IrOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockStart { pc } => write!(f, "block_start 0x{pc:x}"),
            Self::InsnStart { pc } => write!(f, " ---- 0x{pc:x}"),
            Self::Mov { dst, src } => write!(f, "mov {dst}, {src}"),
            Self::Binary { op, dst, a, b } => write!(f, "{} {dst}, {a}, {b}", op.mnemonic()),
            Self::Brcond { cond, a, b, target } => {
                write!(f, "brcond {a}, {b}, {cond:?} -> L{}", target.0)
            }
            Self::SetLabel(l) => write!(f, "set_label L{}", l.0),
            Self::Load { width, signed, dst, base, offset } => {
                let s = if *signed { "s" } else { "u" };
                write!(f, "ld{}{s} {dst}, [{base}{offset:+}]", width.bytes() * 8)
            }
            Self::Store { width, src, base, offset } => {
                write!(f, "st{} {src}, [{base}{offset:+}]", width.bytes() * 8)
            }
            Self::RaiseException { code, tval } => write!(f, "raise_exception {code:#x}, {tval}"),
            Self::GotoTb { slot } => write!(f, "goto_tb {slot}"),
            Self::ExitTb(TbExit::Dispatch) => f.write_str("exit_tb 0"),
            Self::ExitTb(TbExit::Link { slot }) => write!(f, "exit_tb link{slot}"),
            Self::IoStart => f.write_str("io_start"),
            Self::IoEnd => f.write_str("io_end"),
            Self::BlockEnd { icount } => write!(f, "block_end icount={icount}"),
        }
    }
}
