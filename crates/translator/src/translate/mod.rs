//! Translation-block construction.
//!
//! This module turns runs of guest instructions into [`TranslationBlock`]s. It includes:
//! 1. **Context:** Per-build state shared with the decoder.
//! 2. **Builder:** The decode loop and its termination rules.
//! 3. **Exits:** Chaining eligibility and the block epilogues.
//! 4. **Blocks:** The immutable result of a build.

/// Translation block descriptor.
pub mod block;

/// The decode loop.
pub mod builder;

/// Per-block translation state.
pub mod context;

/// Block exits, chaining and exception helpers.
pub mod exit;

pub use block::{DebugKey, TranslationBlock};
pub use builder::{BlockRequest, TranslationEnv, translate_block};
pub use context::{BlockState, CompileFlags, TranslationContext};
