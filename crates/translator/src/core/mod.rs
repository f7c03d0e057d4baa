//! Guest CPU model.
//!
//! This module contains the architectural state the translator reads and
//! translated code writes, plus the registry of named CPU configurations.

/// Architecture-specific components (CSRs, register files, privilege modes, FP status).
pub mod arch;

/// Guest CPU state and its textual dump.
pub mod cpu;

/// Named CPU models and instantiation.
pub mod model;

pub use self::cpu::CpuState;
pub use self::model::{CpuModel, find_model, instantiate, list_models};
