use rvdbt_core::common::VirtAddr;
use rvdbt_core::core::{CpuState, instantiate};
use rvdbt_core::debug::Breakpoints;
use rvdbt_core::ir::{BlockExit, execute};
use rvdbt_core::memory::{GuestMemory, Perms};
use rvdbt_core::isa::rv64i::Rv64iDecoder;
use rvdbt_core::translate::{BlockRequest, CompileFlags, TranslationBlock, TranslationEnv, translate_block};
use rvdbt_core::common::constants::DEFAULT_OP_BUFFER_CAPACITY;
use tracing_subscriber::EnvFilter;

/// Start of the test RAM window.
pub const BASE: u64 = 0x8000_0000;

/// Size of the test RAM window (16 pages).
pub const RAM_SIZE: u64 = 0x1_0000;

/// Routes `tracing` output to the test writer, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Little-endian bytes of an instruction stream.
pub fn program_bytes(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// A CPU, its RAM and the debug state needed to build and run blocks.
pub struct TestContext {
    pub cpu: CpuState,
    pub memory: GuestMemory,
    pub breakpoints: Breakpoints,
    pub singlestep: bool,
    pub force_single_insn: bool,
    pub op_buffer_capacity: usize,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Default `riscv` model with `RAM_SIZE` bytes of RWX memory at `BASE`.
    pub fn new() -> Self {
        Self::with_model("riscv")
    }

    pub fn with_model(model: &str) -> Self {
        init_tracing();
        let mut memory = GuestMemory::new();
        memory.map(BASE, RAM_SIZE, Perms::RWX.with_user()).unwrap();
        let mut cpu = instantiate(model).unwrap();
        cpu.set_pc(VirtAddr::new(BASE));
        Self {
            cpu,
            memory,
            breakpoints: Breakpoints::new(),
            singlestep: false,
            force_single_insn: false,
            op_buffer_capacity: DEFAULT_OP_BUFFER_CAPACITY,
        }
    }

    /// Writes `instructions` at `addr` and points the PC there.
    pub fn load_program(mut self, addr: u64, instructions: &[u32]) -> Self {
        self.memory.write_bytes(addr, &program_bytes(instructions)).unwrap();
        let _ = self.memory.take_written_pages();
        self.cpu.set_pc(VirtAddr::new(addr));
        self
    }

    /// Fills the whole RAM window with `addi x0, x0, 0`.
    pub fn fill_with_nops(self) -> Self {
        let nop = 0x0000_0013;
        self.load_program(BASE, &vec![nop; (RAM_SIZE / 4) as usize])
    }

    pub fn with_breakpoint(mut self, addr: u64) -> Self {
        let _ = self.breakpoints.insert(VirtAddr::new(addr));
        self
    }

    pub fn with_singlestep(mut self) -> Self {
        self.singlestep = true;
        self
    }

    pub fn with_force_single_insn(mut self) -> Self {
        self.force_single_insn = true;
        self
    }

    pub fn with_op_buffer_capacity(mut self, capacity: usize) -> Self {
        self.op_buffer_capacity = capacity;
        self
    }

    /// Request for the current PC with instruction budget `count`.
    pub fn request(&self, count: u32) -> BlockRequest {
        BlockRequest {
            pc: self.cpu.pc(),
            cflags: CompileFlags::with_count(count),
            mem_mode: self.cpu.privilege,
            singlestep: self.singlestep,
        }
    }

    pub fn build(&self, req: &BlockRequest) -> TranslationBlock {
        let decoder = Rv64iDecoder::new();
        let snapshot = self.breakpoints.snapshot(self.singlestep, self.force_single_insn);
        let env = TranslationEnv {
            fetch: &self.memory,
            decoder: &decoder,
            breakpoints: &snapshot,
            force_single_insn: self.force_single_insn,
            op_buffer_capacity: self.op_buffer_capacity,
        };
        translate_block(&self.cpu, &env, req)
    }

    /// Builds the block at the current PC with budget `count` (0 = unbounded).
    pub fn build_here(&self, count: u32) -> TranslationBlock {
        self.build(&self.request(count))
    }

    /// Runs `block` with no linked jump slots.
    pub fn run(&mut self, block: &TranslationBlock) -> BlockExit {
        execute(block, &mut self.cpu, &mut self.memory, |_| false)
    }

    pub fn set_reg(&mut self, reg: usize, val: u64) {
        self.cpu.write_register(reg, val);
    }

    pub fn get_reg(&self, reg: usize) -> u64 {
        self.cpu.read_register(reg)
    }

    pub fn pc(&self) -> u64 {
        self.cpu.pc().val()
    }
}
