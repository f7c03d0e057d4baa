//! Intermediate Representation.
//!
//! Translated blocks are stored as a flat list of [`IrOp`]s. This module provides:
//! 1. **Operations:** The op set emitted by the builder and decoders.
//! 2. **Buffer:** The append-only, capacity-bounded emission buffer.
//! 3. **Executor:** A reference backend that runs a block against guest state.

/// IR emission buffer.
pub mod buffer;

/// Reference IR executor.
pub mod interp;

/// IR operation definitions.
pub mod op;

pub use buffer::IrBuffer;
pub use interp::{BlockExit, execute};
pub use op::{BinOp, Cond, IrOp, Label, MemWidth, Operand, Place, TbExit, Temp};
