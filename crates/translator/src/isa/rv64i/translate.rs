//! RV64I to IR translation.
//!
//! [`Rv64iDecoder`] implements the decoder contract for the base integer ISA
//! plus `FENCE`, `FENCE.I`, `ECALL` and `EBREAK`. Every other encoding is
//! reported as illegal.
//!
//! Control transfer follows one convention: a conditional branch leaves through
//! jump slot 1 when not taken and slot 0 when taken, `JAL` uses slot 0, and `JALR`
//! always returns to the dispatcher because its target is only known at run time.

use crate::core::arch::csr::{MISA, MISA_EXT_C};
use crate::core::arch::mode::PrivilegeMode;
use crate::core::cpu::CpuState;
use crate::ir::buffer::IrBuffer;
use crate::ir::op::{BinOp, Cond, IrOp, MemWidth, Operand, Place, TbExit};
use crate::isa::decode::decode;
use crate::isa::decoder::{DecodeOutcome, InstructionDecoder};
use crate::isa::instruction::{Decoded, InstructionBits};
use crate::isa::privileged::cause::exception;
use crate::isa::privileged::opcodes::{EBREAK, ECALL, OP_SYSTEM};
use crate::isa::rv64i::funct3::{self, alu, branch, fence, load, store};
use crate::isa::rv64i::funct7;
use crate::isa::rv64i::opcodes::{
    OP_AUIPC, OP_BRANCH, OP_IMM, OP_IMM_32, OP_JAL, OP_JALR, OP_LOAD, OP_LUI, OP_MISC_MEM,
    OP_REG, OP_REG_32, OP_STORE,
};
use crate::translate::context::{BlockState, TranslationContext};
use crate::translate::exit::{gen_exception, gen_exception_badaddr, gen_exception_with_tval, gen_goto_tb};

use DecodeOutcome::{Emitted, Illegal};

/// Reference decoder for RV64I.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rv64iDecoder;

impl Rv64iDecoder {
    /// Creates the decoder.
    pub const fn new() -> Self {
        Self
    }
}

impl InstructionDecoder for Rv64iDecoder {
    fn decode_one(
        &self,
        cpu: &CpuState,
        ctx: &mut TranslationContext,
        ir: &mut IrBuffer,
        insn: u32,
    ) -> DecodeOutcome {
        let d = decode(insn);
        match d.opcode {
            OP_LUI => {
                ir.set_gpr(d.rd, d.imm_bits());
                Emitted
            }
            OP_AUIPC => {
                ir.set_gpr(d.rd, ctx.pc().val().wrapping_add(d.imm_bits()));
                Emitted
            }
            OP_JAL => gen_jal(cpu, ctx, ir, &d),
            OP_JALR if d.funct3 == funct3::JALR => gen_jalr(cpu, ctx, ir, &d),
            OP_BRANCH => gen_branch(cpu, ctx, ir, &d),
            OP_LOAD => gen_load(ir, &d),
            OP_STORE => gen_store(ir, &d),
            OP_IMM => gen_arith_imm(ir, &d),
            OP_IMM_32 => gen_arith_imm_w(ir, &d),
            OP_REG => gen_arith(ir, &d),
            OP_REG_32 => gen_arith_w(ir, &d),
            OP_MISC_MEM => gen_fence(ctx, ir, &d),
            OP_SYSTEM => gen_system(ctx, ir, &d),
            _ => Illegal,
        }
    }
}

/// Bits of a jump target that must be clear: without the C extension targets
/// must be 4-byte aligned (bit 0 is always cleared or zero by encoding).
fn target_misalign_mask(cpu: &CpuState) -> u64 {
    if cpu.read_csr(MISA) & MISA_EXT_C != 0 { 0 } else { 0b10 }
}

fn emit_binary(ir: &mut IrBuffer, op: BinOp, rd: usize, a: Operand, b: Operand) -> DecodeOutcome {
    if rd != 0 {
        ir.push(IrOp::Binary {
            op,
            dst: Place::Gpr(rd),
            a,
            b,
        });
    }
    Emitted
}

fn gen_jal(
    cpu: &CpuState,
    ctx: &mut TranslationContext,
    ir: &mut IrBuffer,
    d: &Decoded,
) -> DecodeOutcome {
    let target = ctx.pc().val().wrapping_add(d.imm_bits());
    if target & target_misalign_mask(cpu) != 0 {
        gen_exception_with_tval(
            ctx,
            ir,
            exception::INSTRUCTION_ADDRESS_MISALIGNED,
            Operand::Const(target),
        );
    } else {
        ir.set_gpr(d.rd, ctx.next_pc().val());
        gen_goto_tb(ctx, ir, 0, target.into());
    }
    ctx.set_state(BlockState::Branch);
    Emitted
}

fn gen_jalr(
    cpu: &CpuState,
    ctx: &mut TranslationContext,
    ir: &mut IrBuffer,
    d: &Decoded,
) -> DecodeOutcome {
    let target = ir.new_temp();
    ir.push(IrOp::Binary {
        op: BinOp::Add,
        dst: target.into(),
        a: IrBuffer::gpr(d.rs1),
        b: Operand::Const(d.imm_bits()),
    });
    ir.push(IrOp::Binary {
        op: BinOp::And,
        dst: target.into(),
        a: target.into(),
        b: Operand::Const(!1),
    });

    let mask = target_misalign_mask(cpu);
    let misaligned = (mask != 0).then(|| {
        let label = ir.new_label();
        let low = ir.new_temp();
        ir.push(IrOp::Binary {
            op: BinOp::And,
            dst: low.into(),
            a: target.into(),
            b: Operand::Const(mask),
        });
        ir.push(IrOp::Brcond {
            cond: Cond::Ne,
            a: low.into(),
            b: Operand::Const(0),
            target: label,
        });
        label
    });

    ir.set_gpr(d.rd, ctx.next_pc().val());
    ir.set_pc(target);
    ir.push(IrOp::ExitTb(TbExit::Dispatch));

    if let Some(label) = misaligned {
        ir.push(IrOp::SetLabel(label));
        gen_exception_with_tval(
            ctx,
            ir,
            exception::INSTRUCTION_ADDRESS_MISALIGNED,
            target.into(),
        );
    }
    ctx.set_state(BlockState::Branch);
    Emitted
}

fn gen_branch(
    cpu: &CpuState,
    ctx: &mut TranslationContext,
    ir: &mut IrBuffer,
    d: &Decoded,
) -> DecodeOutcome {
    let cond = match d.funct3 {
        branch::BEQ => Cond::Eq,
        branch::BNE => Cond::Ne,
        branch::BLT => Cond::Lt,
        branch::BGE => Cond::Ge,
        branch::BLTU => Cond::Ltu,
        branch::BGEU => Cond::Geu,
        _ => return Illegal,
    };
    let target = ctx.pc().val().wrapping_add(d.imm_bits());
    let taken = ir.new_label();

    ir.push(IrOp::Brcond {
        cond,
        a: IrBuffer::gpr(d.rs1),
        b: IrBuffer::gpr(d.rs2),
        target: taken,
    });
    gen_goto_tb(ctx, ir, 1, ctx.next_pc());
    ir.push(IrOp::SetLabel(taken));
    if target & target_misalign_mask(cpu) != 0 {
        gen_exception_with_tval(
            ctx,
            ir,
            exception::INSTRUCTION_ADDRESS_MISALIGNED,
            Operand::Const(target),
        );
    } else {
        gen_goto_tb(ctx, ir, 0, target.into());
    }
    ctx.set_state(BlockState::Branch);
    Emitted
}

fn gen_load(ir: &mut IrBuffer, d: &Decoded) -> DecodeOutcome {
    let (width, signed) = match d.funct3 {
        load::LB => (MemWidth::Byte, true),
        load::LH => (MemWidth::Half, true),
        load::LW => (MemWidth::Word, true),
        load::LD => (MemWidth::Double, false),
        load::LBU => (MemWidth::Byte, false),
        load::LHU => (MemWidth::Half, false),
        load::LWU => (MemWidth::Word, false),
        _ => return Illegal,
    };
    // Loads into x0 still access memory and may fault.
    let value = ir.new_temp();
    ir.push(IrOp::Load {
        width,
        signed,
        dst: value.into(),
        base: IrBuffer::gpr(d.rs1),
        offset: d.imm,
    });
    ir.set_gpr(d.rd, value);
    Emitted
}

fn gen_store(ir: &mut IrBuffer, d: &Decoded) -> DecodeOutcome {
    let width = match d.funct3 {
        store::SB => MemWidth::Byte,
        store::SH => MemWidth::Half,
        store::SW => MemWidth::Word,
        store::SD => MemWidth::Double,
        _ => return Illegal,
    };
    ir.push(IrOp::Store {
        width,
        src: IrBuffer::gpr(d.rs2),
        base: IrBuffer::gpr(d.rs1),
        offset: d.imm,
    });
    Emitted
}

fn gen_arith_imm(ir: &mut IrBuffer, d: &Decoded) -> DecodeOutcome {
    let funct6 = d.raw.funct6();
    let shamt = u64::from(d.raw.shamt());
    let (op, b) = match d.funct3 {
        alu::ADD_SUB => (BinOp::Add, d.imm_bits()),
        alu::SLT => (BinOp::Slt, d.imm_bits()),
        alu::SLTU => (BinOp::Sltu, d.imm_bits()),
        alu::XOR => (BinOp::Xor, d.imm_bits()),
        alu::OR => (BinOp::Or, d.imm_bits()),
        alu::AND => (BinOp::And, d.imm_bits()),
        alu::SLL if funct6 == 0 => (BinOp::Sll, shamt),
        alu::SRL_SRA if funct6 == 0 => (BinOp::Srl, shamt),
        alu::SRL_SRA if funct6 == funct7::SRAI_FUNCT6 => (BinOp::Sra, shamt),
        _ => return Illegal,
    };
    emit_binary(ir, op, d.rd, IrBuffer::gpr(d.rs1), Operand::Const(b))
}

fn gen_arith_imm_w(ir: &mut IrBuffer, d: &Decoded) -> DecodeOutcome {
    let shamt = d.rs2 as u64;
    let (op, b) = match (d.funct3, d.funct7) {
        (alu::ADD_SUB, _) => (BinOp::AddW, d.imm_bits()),
        (alu::SLL, funct7::DEFAULT) => (BinOp::SllW, shamt),
        (alu::SRL_SRA, funct7::DEFAULT) => (BinOp::SrlW, shamt),
        (alu::SRL_SRA, funct7::ALT) => (BinOp::SraW, shamt),
        _ => return Illegal,
    };
    emit_binary(ir, op, d.rd, IrBuffer::gpr(d.rs1), Operand::Const(b))
}

fn gen_arith(ir: &mut IrBuffer, d: &Decoded) -> DecodeOutcome {
    let op = match (d.funct3, d.funct7) {
        (alu::ADD_SUB, funct7::DEFAULT) => BinOp::Add,
        (alu::ADD_SUB, funct7::ALT) => BinOp::Sub,
        (alu::SLL, funct7::DEFAULT) => BinOp::Sll,
        (alu::SLT, funct7::DEFAULT) => BinOp::Slt,
        (alu::SLTU, funct7::DEFAULT) => BinOp::Sltu,
        (alu::XOR, funct7::DEFAULT) => BinOp::Xor,
        (alu::SRL_SRA, funct7::DEFAULT) => BinOp::Srl,
        (alu::SRL_SRA, funct7::ALT) => BinOp::Sra,
        (alu::OR, funct7::DEFAULT) => BinOp::Or,
        (alu::AND, funct7::DEFAULT) => BinOp::And,
        _ => return Illegal,
    };
    emit_binary(ir, op, d.rd, IrBuffer::gpr(d.rs1), IrBuffer::gpr(d.rs2))
}

fn gen_arith_w(ir: &mut IrBuffer, d: &Decoded) -> DecodeOutcome {
    let op = match (d.funct3, d.funct7) {
        (alu::ADD_SUB, funct7::DEFAULT) => BinOp::AddW,
        (alu::ADD_SUB, funct7::ALT) => BinOp::SubW,
        (alu::SLL, funct7::DEFAULT) => BinOp::SllW,
        (alu::SRL_SRA, funct7::DEFAULT) => BinOp::SrlW,
        (alu::SRL_SRA, funct7::ALT) => BinOp::SraW,
        _ => return Illegal,
    };
    emit_binary(ir, op, d.rd, IrBuffer::gpr(d.rs1), IrBuffer::gpr(d.rs2))
}

fn gen_fence(ctx: &mut TranslationContext, ir: &mut IrBuffer, d: &Decoded) -> DecodeOutcome {
    match d.funct3 {
        fence::FENCE => Emitted,
        fence::FENCE_I => {
            // Code after the fence may have been rewritten; re-translate from the next PC.
            ir.set_pc(ctx.next_pc().val());
            ctx.set_state(BlockState::Stop);
            Emitted
        }
        _ => Illegal,
    }
}

fn gen_system(ctx: &mut TranslationContext, ir: &mut IrBuffer, d: &Decoded) -> DecodeOutcome {
    match d.raw {
        ECALL => {
            let code = match ctx.mem_mode() {
                PrivilegeMode::User => exception::ENVIRONMENT_CALL_FROM_U_MODE,
                PrivilegeMode::Supervisor => exception::ENVIRONMENT_CALL_FROM_S_MODE,
                PrivilegeMode::Machine => exception::ENVIRONMENT_CALL_FROM_M_MODE,
            };
            gen_exception(ctx, ir, code);
        }
        EBREAK => gen_exception_badaddr(ctx, ir, exception::BREAKPOINT),
        _ => return Illegal,
    }
    ctx.set_state(BlockState::Branch);
    Emitted
}
