//! RV64I base integer ISA.
//!
//! Opcode tables live in `opcodes`, `funct3` and `funct7`; `translate` turns
//! decoded words into IR.

pub mod funct3;
pub mod funct7;
pub mod opcodes;
pub mod translate;

pub use translate::Rv64iDecoder;
