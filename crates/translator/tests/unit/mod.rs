//! # Unit Components
//!
//! Tests grouped the way the source tree is: shared types, the CPU model, the
//! ISA decoder, the IR executor, block building, the code cache and the engine.
