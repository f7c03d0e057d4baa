//! CPU Model Registry.
//!
//! Models are immutable, process-wide entries of a static table. A model only
//! fixes the reset value of `misa`; everything else about a fresh hart is
//! common to all models.

use tracing::debug;

use crate::common::Error;
use crate::core::arch::csr::{
    MISA_EXT_A, MISA_EXT_D, MISA_EXT_F, MISA_EXT_I, MISA_EXT_M, MISA_EXT_S, MISA_EXT_U,
    MISA_XLEN_64,
};
use crate::core::cpu::CpuState;

/// A named guest CPU configuration.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct CpuModel {
    /// Model name, matched case-insensitively.
    pub name: &'static str,
    /// Reset value of `misa`.
    pub init_misa: u64,
}

/// Registered models.
static MODELS: [CpuModel; 2] = [
    // RV64G
    CpuModel {
        name: "riscv",
        init_misa: MISA_XLEN_64
            | MISA_EXT_S
            | MISA_EXT_U
            | MISA_EXT_I
            | MISA_EXT_M
            | MISA_EXT_A
            | MISA_EXT_F
            | MISA_EXT_D,
    },
    // Base integer only.
    CpuModel {
        name: "rv64i",
        init_misa: MISA_XLEN_64 | MISA_EXT_S | MISA_EXT_U | MISA_EXT_I,
    },
];

/// Looks a model up by name, ignoring ASCII case.
pub fn find_model(name: &str) -> Result<&'static CpuModel, Error> {
    MODELS
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnknownModel(name.to_owned()))
}

/// Names of all registered models, in table order.
pub fn list_models() -> Vec<&'static str> {
    MODELS.iter().map(|m| m.name).collect()
}

/// Creates a fresh hart of the named model.
pub fn instantiate(name: &str) -> Result<CpuState, Error> {
    let model = find_model(name)?;
    debug!(model = model.name, misa = format_args!("{:#x}", model.init_misa), "instantiating cpu");
    Ok(CpuState::new(model))
}
