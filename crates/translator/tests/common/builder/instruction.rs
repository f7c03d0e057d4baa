use rvdbt_core::isa::privileged::opcodes::OP_SYSTEM;
use rvdbt_core::isa::rv64i::funct3::{alu, branch, fence, load, store};
use rvdbt_core::isa::rv64i::opcodes::*;

/// Encodes RV64I instruction words field by field.
///
/// The mnemonic helpers fill every field; `build()` packs them according to the
/// format the opcode implies.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstructionBuilder {
    opcode: u32,
    rd: u32,
    funct3: u32,
    rs1: u32,
    rs2: u32,
    funct7: u32,
    imm: i32,
}

impl InstructionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn r(self, opcode: u32, funct3: u32, funct7: u32, rd: u32, rs1: u32, rs2: u32) -> Self {
        Self {
            opcode,
            rd,
            funct3,
            rs1,
            rs2,
            funct7,
            ..self
        }
    }

    fn i(self, opcode: u32, funct3: u32, rd: u32, rs1: u32, imm: i32) -> Self {
        Self {
            opcode,
            rd,
            funct3,
            rs1,
            imm,
            ..self
        }
    }

    fn s(self, opcode: u32, funct3: u32, rs1: u32, rs2: u32, imm: i32) -> Self {
        Self {
            opcode,
            funct3,
            rs1,
            rs2,
            imm,
            ..self
        }
    }

    // --- U / J ---

    /// `imm` is the 20-bit upper immediate.
    pub fn lui(self, rd: u32, imm: i32) -> Self {
        self.i(OP_LUI, 0, rd, 0, imm)
    }

    /// `imm` is the 20-bit upper immediate.
    pub fn auipc(self, rd: u32, imm: i32) -> Self {
        self.i(OP_AUIPC, 0, rd, 0, imm)
    }

    pub fn jal(self, rd: u32, offset: i32) -> Self {
        self.i(OP_JAL, 0, rd, 0, offset)
    }

    pub fn jalr(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_JALR, 0, rd, rs1, imm)
    }

    // --- Branches ---

    pub fn branch(self, funct3: u32, rs1: u32, rs2: u32, offset: i32) -> Self {
        self.s(OP_BRANCH, funct3, rs1, rs2, offset)
    }

    pub fn beq(self, rs1: u32, rs2: u32, offset: i32) -> Self {
        self.branch(branch::BEQ, rs1, rs2, offset)
    }

    pub fn bne(self, rs1: u32, rs2: u32, offset: i32) -> Self {
        self.branch(branch::BNE, rs1, rs2, offset)
    }

    pub fn blt(self, rs1: u32, rs2: u32, offset: i32) -> Self {
        self.branch(branch::BLT, rs1, rs2, offset)
    }

    // --- Memory ---

    pub fn lb(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_LOAD, load::LB, rd, rs1, imm)
    }

    pub fn lw(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_LOAD, load::LW, rd, rs1, imm)
    }

    pub fn ld(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_LOAD, load::LD, rd, rs1, imm)
    }

    pub fn lbu(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_LOAD, load::LBU, rd, rs1, imm)
    }

    pub fn sb(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.s(OP_STORE, store::SB, rs1, rs2, imm)
    }

    pub fn sw(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.s(OP_STORE, store::SW, rs1, rs2, imm)
    }

    pub fn sd(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.s(OP_STORE, store::SD, rs1, rs2, imm)
    }

    // --- OP-IMM ---

    pub fn addi(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_IMM, alu::ADD_SUB, rd, rs1, imm)
    }

    pub fn slti(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_IMM, alu::SLT, rd, rs1, imm)
    }

    pub fn andi(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_IMM, alu::AND, rd, rs1, imm)
    }

    pub fn slli(self, rd: u32, rs1: u32, shamt: u32) -> Self {
        self.i(OP_IMM, alu::SLL, rd, rs1, shamt as i32)
    }

    pub fn srli(self, rd: u32, rs1: u32, shamt: u32) -> Self {
        self.i(OP_IMM, alu::SRL_SRA, rd, rs1, shamt as i32)
    }

    /// funct6 `010000` lands in imm[11:6].
    pub fn srai(self, rd: u32, rs1: u32, shamt: u32) -> Self {
        self.i(OP_IMM, alu::SRL_SRA, rd, rs1, (0x400 | shamt) as i32)
    }

    pub fn addiw(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_IMM_32, alu::ADD_SUB, rd, rs1, imm)
    }

    pub fn sraiw(self, rd: u32, rs1: u32, shamt: u32) -> Self {
        self.i(OP_IMM_32, alu::SRL_SRA, rd, rs1, (0x400 | shamt) as i32)
    }

    // --- OP / OP-32 ---

    pub fn op(self, funct3: u32, funct7: u32, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.r(OP_REG, funct3, funct7, rd, rs1, rs2)
    }

    pub fn op32(self, funct3: u32, funct7: u32, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.r(OP_REG_32, funct3, funct7, rd, rs1, rs2)
    }

    pub fn add(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.op(alu::ADD_SUB, 0, rd, rs1, rs2)
    }

    pub fn sub(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.op(alu::ADD_SUB, 0b010_0000, rd, rs1, rs2)
    }

    pub fn sra(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.op(alu::SRL_SRA, 0b010_0000, rd, rs1, rs2)
    }

    pub fn sltu(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.op(alu::SLTU, 0, rd, rs1, rs2)
    }

    pub fn addw(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.op32(alu::ADD_SUB, 0, rd, rs1, rs2)
    }

    pub fn subw(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.op32(alu::ADD_SUB, 0b010_0000, rd, rs1, rs2)
    }

    pub fn sraw(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.op32(alu::SRL_SRA, 0b010_0000, rd, rs1, rs2)
    }

    // --- System ---

    pub fn fence(self) -> Self {
        self.i(OP_MISC_MEM, fence::FENCE, 0, 0, 0x0FF)
    }

    pub fn fence_i(self) -> Self {
        self.i(OP_MISC_MEM, fence::FENCE_I, 0, 0, 0)
    }

    pub fn ecall(self) -> Self {
        self.i(OP_SYSTEM, 0, 0, 0, 0)
    }

    pub fn ebreak(self) -> Self {
        self.i(OP_SYSTEM, 0, 0, 0, 1)
    }

    /// `addi x0, x0, 0`
    pub fn nop(self) -> Self {
        self.addi(0, 0, 0)
    }

    pub fn build(self) -> u32 {
        let opcode = self.opcode & 0x7F;
        let rd = (self.rd & 0x1F) << 7;
        let funct3 = (self.funct3 & 0x7) << 12;
        let rs1 = (self.rs1 & 0x1F) << 15;
        let rs2 = (self.rs2 & 0x1F) << 20;
        let imm = self.imm as u32;

        match opcode {
            OP_IMM | OP_IMM_32 | OP_LOAD | OP_JALR | OP_MISC_MEM | OP_SYSTEM => {
                ((imm & 0xFFF) << 20) | rs1 | funct3 | rd | opcode
            }
            OP_STORE => {
                (((imm >> 5) & 0x7F) << 25) | rs2 | rs1 | funct3 | ((imm & 0x1F) << 7) | opcode
            }
            OP_BRANCH => {
                (((imm >> 12) & 1) << 31)
                    | (((imm >> 5) & 0x3F) << 25)
                    | rs2
                    | rs1
                    | funct3
                    | (((imm >> 1) & 0xF) << 8)
                    | (((imm >> 11) & 1) << 7)
                    | opcode
            }
            OP_LUI | OP_AUIPC => ((imm & 0xFFFFF) << 12) | rd | opcode,
            OP_JAL => {
                (((imm >> 20) & 1) << 31)
                    | (((imm >> 1) & 0x3FF) << 21)
                    | (((imm >> 11) & 1) << 20)
                    | (((imm >> 12) & 0xFF) << 12)
                    | rd
                    | opcode
            }
            _ => ((self.funct7 & 0x7F) << 25) | rs2 | rs1 | funct3 | rd | opcode,
        }
    }
}

/// Shorthand for `InstructionBuilder::new()`.
pub fn insn() -> InstructionBuilder {
    InstructionBuilder::new()
}
