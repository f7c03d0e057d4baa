//! Global Translator Constants.
//!
//! This module defines system-wide constants used across the translator. It includes:
//! 1. **Memory Constants:** Page sizes, masks, and shifts for guest pages.
//! 2. **Instruction Constants:** Instruction width.
//! 3. **Budget Constants:** Per-block instruction and IR-buffer limits.

/// Guest page size in bytes (4KB).
pub const PAGE_SIZE: u64 = 4096;

/// Number of bits to shift to convert between bytes and pages.
pub const PAGE_SHIFT: u64 = 12;

/// Mask selecting the page base of an address.
pub const PAGE_MASK: u64 = !(PAGE_SIZE - 1);

/// Size of a standard (32-bit) RISC-V instruction in bytes.
///
/// Every decoded instruction advances the translation PC by exactly this amount.
pub const INSTRUCTION_WIDTH: u64 = 4;

/// Mask of the instruction-count field in the compile flags.
///
/// A count of zero in the flags means "no explicit budget" and selects this value.
pub const CF_COUNT_MASK: u32 = 0x7FFF;

/// Hard upper bound on the number of guest instructions in one block.
pub const MAX_INSNS_PER_BLOCK: u32 = 512;

/// Upper bound on IR operations a single guest instruction may append.
///
/// The IR buffer reports itself full once fewer than this many slots remain, so the
/// instruction being decoded can never overflow it.
pub const MAX_OPS_PER_INSN: usize = 32;

/// Default IR buffer capacity in operations.
pub const DEFAULT_OP_BUFFER_CAPACITY: usize = 640;

/// Number of patchable chaining slots per translation block.
pub const JUMP_SLOTS: usize = 2;
