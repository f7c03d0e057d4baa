//! Error and Trap definitions.
//!
//! This module defines the error families of the translator:
//! 1. **Host Errors:** [`Error`], genuine failures returned to the caller (unknown CPU
//!    model, unreadable image, bad configuration).
//! 2. **Memory Faults:** [`MemFault`], reported by the guest memory when a fetch, load
//!    or store cannot be satisfied.
//! 3. **Guest Traps:** [`Trap`], guest-visible conditions. These are never raised on the
//!    host during translation; they are emitted as IR and observed when a block runs.

use std::path::PathBuf;

use thiserror::Error;

use crate::isa::privileged::cause::{self, exception};

/// Host-side failures surfaced to the embedding application.
#[derive(Debug, Error)]
pub enum Error {
    /// No CPU model with the requested name is registered.
    #[error("no such CPU model: '{0}'")]
    UnknownModel(String),

    /// An image file could not be read.
    #[error("could not read '{path}': {source}")]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An ELF image could not be parsed.
    #[error("malformed ELF image: {0}")]
    Elf(#[from] object::Error),

    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A guest memory region overlaps an existing mapping.
    #[error("memory region {base:#x}+{size:#x} overlaps an existing mapping")]
    MappingOverlap {
        /// Base address of the rejected region.
        base: u64,
        /// Size in bytes of the rejected region.
        size: u64,
    },

    /// The host could not allocate backing storage for a guest memory region.
    #[error("cannot allocate {size:#x} bytes for memory region at {base:#x}")]
    OutOfMemory {
        /// Base address of the region.
        base: u64,
        /// Requested size in bytes.
        size: u64,
    },

    /// A host-side copy into guest memory hit an unmapped address.
    #[error("guest memory: {0}")]
    Memory(#[from] MemFault),

    /// An image contained nothing to load.
    #[error("image '{0}' has no loadable segments")]
    NoImage(PathBuf),
}

/// Memory access failures reported by the guest memory subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MemFault {
    /// The address is not backed by any mapping.
    #[error("access fault at {0:#x}")]
    AccessFault(u64),

    /// The address is mapped but the permissions forbid the access in the current mode.
    #[error("page fault at {0:#x}")]
    PageFault(u64),

    /// The access is not naturally aligned.
    #[error("misaligned access at {0:#x}")]
    Misaligned(u64),
}

impl MemFault {
    /// Returns the faulting guest address.
    pub const fn addr(self) -> u64 {
        match self {
            Self::AccessFault(a) | Self::PageFault(a) | Self::Misaligned(a) => a,
        }
    }

    /// Cause code for this fault when it happens on an instruction fetch.
    pub const fn fetch_cause(self) -> u64 {
        match self {
            Self::AccessFault(_) => exception::INSTRUCTION_ACCESS_FAULT,
            Self::PageFault(_) => exception::INSTRUCTION_PAGE_FAULT,
            Self::Misaligned(_) => exception::INSTRUCTION_ADDRESS_MISALIGNED,
        }
    }

    /// Cause code for this fault when it happens on a load.
    pub const fn load_cause(self) -> u64 {
        match self {
            Self::AccessFault(_) => exception::LOAD_ACCESS_FAULT,
            Self::PageFault(_) => exception::LOAD_PAGE_FAULT,
            Self::Misaligned(_) => exception::LOAD_ADDRESS_MISALIGNED,
        }
    }

    /// Cause code for this fault when it happens on a store.
    pub const fn store_cause(self) -> u64 {
        match self {
            Self::AccessFault(_) => exception::STORE_ACCESS_FAULT,
            Self::PageFault(_) => exception::STORE_PAGE_FAULT,
            Self::Misaligned(_) => exception::STORE_ADDRESS_MISALIGNED,
        }
    }
}

/// Guest-visible traps observed when translated code runs.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Trap {
    /// Instruction address misaligned; carries the offending target address.
    #[error("InstructionAddressMisaligned({0:#x})")]
    InstructionAddressMisaligned(u64),

    /// Instruction fetch hit unmapped memory; carries the faulting address.
    #[error("InstructionAccessFault({0:#x})")]
    InstructionAccessFault(u64),

    /// The decoder rejected the instruction encoding.
    #[error("IllegalInstruction({0:#x})")]
    IllegalInstruction(u64),

    /// `EBREAK` executed; carries the program counter.
    #[error("Breakpoint({0:#x})")]
    Breakpoint(u64),

    /// Misaligned load; carries the address.
    #[error("LoadAddressMisaligned({0:#x})")]
    LoadAddressMisaligned(u64),

    /// Load from unmapped memory; carries the address.
    #[error("LoadAccessFault({0:#x})")]
    LoadAccessFault(u64),

    /// Misaligned store; carries the address.
    #[error("StoreAddressMisaligned({0:#x})")]
    StoreAddressMisaligned(u64),

    /// Store to unmapped memory; carries the address.
    #[error("StoreAccessFault({0:#x})")]
    StoreAccessFault(u64),

    /// Environment call from user mode.
    #[error("EnvironmentCallFromUMode")]
    EnvironmentCallFromUMode,

    /// Environment call from supervisor mode.
    #[error("EnvironmentCallFromSMode")]
    EnvironmentCallFromSMode,

    /// Environment call from machine mode.
    #[error("EnvironmentCallFromMMode")]
    EnvironmentCallFromMMode,

    /// Instruction fetch blocked by page permissions; carries the address.
    #[error("InstructionPageFault({0:#x})")]
    InstructionPageFault(u64),

    /// Load blocked by page permissions; carries the address.
    #[error("LoadPageFault({0:#x})")]
    LoadPageFault(u64),

    /// Store blocked by page permissions; carries the address.
    #[error("StorePageFault({0:#x})")]
    StorePageFault(u64),

    /// Debug stop (breakpoint hit or single-step completion); carries the PC.
    #[error("DebugTrap({0:#x})")]
    Debug(u64),

    /// Any cause code without a dedicated variant.
    #[error("Exception(cause={cause}, tval={tval:#x})")]
    Other {
        /// Raw cause code.
        cause: u64,
        /// Trap value.
        tval: u64,
    },
}

impl Trap {
    /// Builds a trap from a raw cause code and trap value.
    ///
    /// # Arguments
    ///
    /// * `code` - Exception cause code as raised by translated code.
    /// * `tval` - Trap value (fault address or zero).
    /// * `pc` - Program counter of the trapping instruction.
    pub const fn from_cause(code: u64, tval: u64, pc: u64) -> Self {
        match code {
            exception::INSTRUCTION_ADDRESS_MISALIGNED => Self::InstructionAddressMisaligned(tval),
            exception::INSTRUCTION_ACCESS_FAULT => Self::InstructionAccessFault(tval),
            exception::ILLEGAL_INSTRUCTION => Self::IllegalInstruction(tval),
            exception::BREAKPOINT => Self::Breakpoint(pc),
            exception::LOAD_ADDRESS_MISALIGNED => Self::LoadAddressMisaligned(tval),
            exception::LOAD_ACCESS_FAULT => Self::LoadAccessFault(tval),
            exception::STORE_ADDRESS_MISALIGNED => Self::StoreAddressMisaligned(tval),
            exception::STORE_ACCESS_FAULT => Self::StoreAccessFault(tval),
            exception::ENVIRONMENT_CALL_FROM_U_MODE => Self::EnvironmentCallFromUMode,
            exception::ENVIRONMENT_CALL_FROM_S_MODE => Self::EnvironmentCallFromSMode,
            exception::ENVIRONMENT_CALL_FROM_M_MODE => Self::EnvironmentCallFromMMode,
            exception::INSTRUCTION_PAGE_FAULT => Self::InstructionPageFault(tval),
            exception::LOAD_PAGE_FAULT => Self::LoadPageFault(tval),
            exception::STORE_PAGE_FAULT => Self::StorePageFault(tval),
            cause::EXCP_DEBUG => Self::Debug(pc),
            other => Self::Other { cause: other, tval },
        }
    }

    /// Returns the cause code this trap is raised with.
    pub const fn cause(&self) -> u64 {
        match self {
            Self::InstructionAddressMisaligned(_) => exception::INSTRUCTION_ADDRESS_MISALIGNED,
            Self::InstructionAccessFault(_) => exception::INSTRUCTION_ACCESS_FAULT,
            Self::IllegalInstruction(_) => exception::ILLEGAL_INSTRUCTION,
            Self::Breakpoint(_) => exception::BREAKPOINT,
            Self::LoadAddressMisaligned(_) => exception::LOAD_ADDRESS_MISALIGNED,
            Self::LoadAccessFault(_) => exception::LOAD_ACCESS_FAULT,
            Self::StoreAddressMisaligned(_) => exception::STORE_ADDRESS_MISALIGNED,
            Self::StoreAccessFault(_) => exception::STORE_ACCESS_FAULT,
            Self::EnvironmentCallFromUMode => exception::ENVIRONMENT_CALL_FROM_U_MODE,
            Self::EnvironmentCallFromSMode => exception::ENVIRONMENT_CALL_FROM_S_MODE,
            Self::EnvironmentCallFromMMode => exception::ENVIRONMENT_CALL_FROM_M_MODE,
            Self::InstructionPageFault(_) => exception::INSTRUCTION_PAGE_FAULT,
            Self::LoadPageFault(_) => exception::LOAD_PAGE_FAULT,
            Self::StorePageFault(_) => exception::STORE_PAGE_FAULT,
            Self::Debug(_) => cause::EXCP_DEBUG,
            Self::Other { cause, .. } => *cause,
        }
    }
}
