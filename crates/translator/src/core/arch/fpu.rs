//! Floating-point status configuration.
//!
//! The translator does not implement floating-point arithmetic, but a fresh CPU state
//! still carries the FP environment a backend would honour: the dynamic rounding mode
//! and whether NaN results are replaced by the canonical quiet NaN.
//!
//! | Value | Mode | Description                             |
//! |-------|------|-----------------------------------------|
//! | 0b000 | RNE  | Round to Nearest, ties to Even          |
//! | 0b001 | RTZ  | Round towards Zero                      |
//! | 0b010 | RDN  | Round Down (towards −∞)                 |
//! | 0b011 | RUP  | Round Up (towards +∞)                   |
//! | 0b100 | RMM  | Round to Nearest, ties to Max Magnitude |

/// Canonical quiet NaN for IEEE 754 double-precision.
pub const CANONICAL_NAN_F64: u64 = 0x7ff8_0000_0000_0000;

/// `frm` encodings. 0b101 and 0b110 are reserved; 0b111 selects the dynamic mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum RoundingMode {
    /// Round to nearest, ties to even.
    #[default]
    Rne = 0b000,
    /// Round towards zero.
    Rtz = 0b001,
    /// Round down, towards negative infinity.
    Rdn = 0b010,
    /// Round up, towards positive infinity.
    Rup = 0b011,
    /// Round to nearest, ties to max magnitude.
    Rmm = 0b100,
}

/// Floating-point environment of one guest CPU.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FpStatus {
    /// Dynamic rounding mode (`fcsr.frm`).
    pub rounding_mode: RoundingMode,
    /// Replace every NaN result with [`CANONICAL_NAN_F64`].
    pub default_nan: bool,
    /// Accrued exception flags (`fcsr.fflags`).
    pub flags: u8,
}

impl Default for FpStatus {
    /// RISC-V reset environment: round-to-nearest-even, default-NaN mode on.
    fn default() -> Self {
        Self {
            rounding_mode: RoundingMode::Rne,
            default_nan: true,
            flags: 0,
        }
    }
}
