//! Raw instruction words.
//!
//! [`InstructionBits`] reads the fixed fields straight out of an encoding;
//! [`Decoded`] is the same word split once, with its immediate already
//! sign-extended for the format its opcode implies.

const OPCODE_FIELD: u32 = 0x7F;
const REG_FIELD: u32 = 0x1F;
const FUNCT3_FIELD: u32 = 0x7;
const FUNCT7_FIELD: u32 = 0x7F;
const SHAMT_FIELD: u32 = 0x3F;

/// Field accessors over a 32-bit encoding.
pub trait InstructionBits: Copy {
    /// Major opcode, bits 6:0.
    fn opcode(self) -> u32;
    /// Destination register, bits 11:7.
    fn rd(self) -> usize;
    /// First source register, bits 19:15.
    fn rs1(self) -> usize;
    /// Second source register, bits 24:20.
    fn rs2(self) -> usize;
    /// Minor opcode, bits 14:12.
    fn funct3(self) -> u32;
    /// Bits 31:25.
    fn funct7(self) -> u32;
    /// Bits 31:26; selects the shift kind of RV64 immediate shifts.
    fn funct6(self) -> u32;
    /// Six-bit shift amount of `SLLI`/`SRLI`/`SRAI`, bits 25:20.
    fn shamt(self) -> u32;
}

impl InstructionBits for u32 {
    #[inline]
    fn opcode(self) -> u32 {
        self & OPCODE_FIELD
    }

    #[inline]
    fn rd(self) -> usize {
        ((self >> 7) & REG_FIELD) as usize
    }

    #[inline]
    fn rs1(self) -> usize {
        ((self >> 15) & REG_FIELD) as usize
    }

    #[inline]
    fn rs2(self) -> usize {
        ((self >> 20) & REG_FIELD) as usize
    }

    #[inline]
    fn funct3(self) -> u32 {
        (self >> 12) & FUNCT3_FIELD
    }

    #[inline]
    fn funct7(self) -> u32 {
        (self >> 25) & FUNCT7_FIELD
    }

    #[inline]
    fn funct6(self) -> u32 {
        self >> 26
    }

    #[inline]
    fn shamt(self) -> u32 {
        (self >> 20) & SHAMT_FIELD
    }
}

/// An encoding split into fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    /// The word as fetched.
    pub raw: u32,
    /// Major opcode.
    pub opcode: u32,
    /// Destination register.
    pub rd: usize,
    /// First source register.
    pub rs1: usize,
    /// Second source register (also the 5-bit shift amount of the W shifts).
    pub rs2: usize,
    /// Minor opcode.
    pub funct3: u32,
    /// Bits 31:25.
    pub funct7: u32,
    /// Sign-extended immediate; 0 for formats without one.
    pub imm: i64,
}

impl Decoded {
    /// The immediate as a register-width operand.
    #[inline]
    pub const fn imm_bits(&self) -> u64 {
        self.imm as u64
    }
}
