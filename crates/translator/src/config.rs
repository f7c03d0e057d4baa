//! Configuration system for the translator.
//!
//! This module defines the configuration structures used to parameterize a
//! dispatch engine. It provides:
//! 1. **Defaults:** Baseline constants (model, RAM window, block budgets).
//! 2. **Structures:** Hierarchical config for general, translation, debug, and memory settings.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or built with `Config::default()`.

use std::path::Path;

use serde::Deserialize;

use crate::common::Error;

/// Default configuration constants for the translator.
mod defaults {
    use crate::common::constants::{DEFAULT_OP_BUFFER_CAPACITY, MAX_INSNS_PER_BLOCK};

    /// CPU model instantiated when none is named.
    pub const MODEL: &str = "riscv";

    /// Base address of guest RAM (2 GiB).
    pub const RAM_BASE: u64 = 0x8000_0000;

    /// Size of guest RAM (16 MiB).
    pub const RAM_SIZE: u64 = 16 * 1024 * 1024;

    /// Per-block instruction limit.
    pub const MAX_INSNS: u32 = MAX_INSNS_PER_BLOCK;

    /// IR buffer capacity in ops.
    pub const OP_BUFFER_CAPACITY: usize = DEFAULT_OP_BUFFER_CAPACITY;
}

/// Root configuration structure.
///
/// Every section and field is optional in JSON; missing values take their defaults.
///
/// # Examples
///
/// ```
/// use rvdbt_core::config::Config;
///
/// let json = r#"{
///     "general": { "model": "rv64i", "start_pc": 2147483648 },
///     "translation": { "max_insns": 16, "chaining": false },
///     "debug": { "breakpoints": [2147483660] }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.general.model, "rv64i");
/// assert_eq!(config.translation.max_insns, 16);
/// assert!(!config.translation.chaining);
/// assert_eq!(config.translation.op_buffer_capacity, 640);
/// assert_eq!(config.debug.breakpoints, vec![0x8000_000C]);
/// assert_eq!(config.memory.ram_size, 16 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Block building and chaining.
    #[serde(default)]
    pub translation: TranslationConfig,
    /// Debugger controls.
    #[serde(default)]
    pub debug: DebugConfig,
    /// Guest RAM layout.
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

/// General settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneralConfig {
    /// CPU model name (see [`list_models`](crate::core::model::list_models)).
    #[serde(default = "GeneralConfig::default_model")]
    pub model: String,

    /// Initial PC for raw images (ELF images use their entry point).
    #[serde(default = "GeneralConfig::default_start_pc")]
    pub start_pc: u64,

    /// Print every translated block.
    #[serde(default)]
    pub trace_blocks: bool,
}

impl GeneralConfig {
    fn default_model() -> String {
        defaults::MODEL.to_owned()
    }

    const fn default_start_pc() -> u64 {
        defaults::RAM_BASE
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            model: Self::default_model(),
            start_pc: Self::default_start_pc(),
            trace_blocks: false,
        }
    }
}

/// Block building and chaining settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TranslationConfig {
    /// Instruction budget per block (0 means the hard maximum).
    #[serde(default = "TranslationConfig::default_max_insns")]
    pub max_insns: u32,

    /// IR buffer capacity in ops.
    #[serde(default = "TranslationConfig::default_op_buffer_capacity")]
    pub op_buffer_capacity: usize,

    /// Patch direct jumps between blocks.
    #[serde(default = "TranslationConfig::default_chaining")]
    pub chaining: bool,
}

impl TranslationConfig {
    const fn default_max_insns() -> u32 {
        defaults::MAX_INSNS
    }

    const fn default_op_buffer_capacity() -> usize {
        defaults::OP_BUFFER_CAPACITY
    }

    const fn default_chaining() -> bool {
        true
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            max_insns: Self::default_max_insns(),
            op_buffer_capacity: Self::default_op_buffer_capacity(),
            chaining: Self::default_chaining(),
        }
    }
}

/// Debugger controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DebugConfig {
    /// Start in single-step mode.
    #[serde(default)]
    pub singlestep: bool,

    /// Translate one instruction per block.
    #[serde(default)]
    pub force_single_insn: bool,

    /// Initial breakpoint addresses.
    #[serde(default)]
    pub breakpoints: Vec<u64>,
}

/// Guest RAM layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemoryConfig {
    /// RAM base address.
    #[serde(default = "MemoryConfig::default_ram_base")]
    pub ram_base: u64,

    /// RAM size in bytes.
    #[serde(default = "MemoryConfig::default_ram_size")]
    pub ram_size: u64,
}

impl MemoryConfig {
    const fn default_ram_base() -> u64 {
        defaults::RAM_BASE
    }

    const fn default_ram_size() -> u64 {
        defaults::RAM_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            ram_base: Self::default_ram_base(),
            ram_size: Self::default_ram_size(),
        }
    }
}
