//! RISC-V dynamic binary translator library.
//!
//! This crate turns guest RV64 code into translation blocks and runs them. It provides:
//! 1. **Core:** Guest CPU state, CSR/FP environment, and the named CPU model registry.
//! 2. **ISA:** Field decoding and the RV64I instruction decoder that emits IR.
//! 3. **Translation:** The block builder with its termination, breakpoint and exit rules.
//! 4. **IR:** The op set, the bounded emission buffer, and a reference executor.
//! 5. **Cache:** A shared, generation-tagged code cache with block chaining.
//! 6. **Simulation:** Guest memory, image loading, and the dispatch engine.

/// Block cache and chaining links.
pub mod cache;
/// Common types and constants (addresses, errors, traps, registers).
pub mod common;
/// Engine configuration (defaults and JSON-deserializable structures).
pub mod config;
/// Guest CPU state and models.
pub mod core;
/// Breakpoint set and per-build debug snapshots.
pub mod debug;
/// Intermediate representation (ops, buffer, executor).
pub mod ir;
/// Instruction set (decode, RV64I decoder, privileged causes).
pub mod isa;
/// Guest memory regions and access traits.
pub mod memory;
/// Dispatch engine and image loader.
pub mod sim;
/// Dispatcher statistics.
pub mod stats;
/// Translation-block builder.
pub mod translate;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Guest CPU state; create with [`core::instantiate`].
pub use crate::core::CpuState;
/// Dispatch engine; construct with `Engine::new`.
pub use crate::sim::{Engine, StopReason};
/// Result of a block build.
pub use crate::translate::{TranslationBlock, translate_block};
