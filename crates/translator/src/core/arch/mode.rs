//! Privilege levels.
//!
//! A block is built for one mode: every fetch made while building it is
//! checked against that mode, and the block is only reused while the hart
//! stays in it.

use std::fmt;

/// RISC-V privilege level. The discriminants are the architectural encodings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PrivilegeMode {
    /// U-mode.
    User = 0,
    /// S-mode.
    Supervisor = 1,
    /// M-mode, entered at reset.
    #[default]
    Machine = 3,
}

impl fmt::Display for PrivilegeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "U",
            Self::Supervisor => "S",
            Self::Machine => "M",
        })
    }
}
