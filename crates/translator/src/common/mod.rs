//! Common utilities and types used throughout the translator.
//!
//! This module provides the building blocks shared by every other component. It includes:
//! 1. **Address Types:** A strong type for guest virtual addresses with page arithmetic.
//! 2. **Constants:** Page geometry, instruction width and per-block budgets.
//! 3. **Error Handling:** Host errors, memory faults, and guest trap representations.
//! 4. **Register Management:** A unified interface for GPR and FPR access.

/// Guest address type with page helpers.
pub mod addr;

/// Common constants used throughout the translator.
pub mod constants;

/// Error types and trap definitions.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use addr::VirtAddr;
pub use constants::{INSTRUCTION_WIDTH, PAGE_MASK, PAGE_SHIFT, PAGE_SIZE};
pub use error::{Error, MemFault, Trap};
pub use reg::{Bank, RegisterFile};
