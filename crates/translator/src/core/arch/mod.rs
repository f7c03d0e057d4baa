//! Architectural state of one hart: register files, CSRs, the FP environment
//! and privilege levels.

pub mod csr;
pub mod fpr;
pub mod fpu;
pub mod gpr;
pub mod mode;
