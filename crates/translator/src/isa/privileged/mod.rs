//! Privileged-architecture pieces the translator needs: trap causes and the
//! `SYSTEM` instructions that raise them.

pub mod cause;
pub mod opcodes;
