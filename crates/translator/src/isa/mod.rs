//! Instruction-set definitions and the decoder seam.
//!
//! The block builder only knows [`InstructionDecoder`]; `rv64i` supplies the
//! reference implementation on top of the field extraction in `decode` and
//! `instruction`.

pub mod abi;
pub mod decode;
pub mod decoder;
pub mod instruction;
pub mod privileged;
pub mod rv64i;

pub use decoder::{DecodeOutcome, InstructionDecoder};
pub use privileged::cause;
