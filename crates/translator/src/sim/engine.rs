//! Engine: owns the CPU, guest memory and the shared code cache side-by-side.
//!
//! The dispatch loop looks up (or builds) the block at the current PC, runs it, and
//! follows its exit. A block that leaves through an unpatched jump slot gets that
//! slot linked to its successor, so the next pass enters the successor directly.
//!
//! Guest stores are tracked per page; after every block the pages written are
//! invalidated in the cache, which keeps self-modifying code coherent.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::cache::{CachedBlock, CodeCache};
use crate::common::constants::{INSTRUCTION_WIDTH, JUMP_SLOTS, PAGE_SIZE};
use crate::common::{Error, Trap, VirtAddr};
use crate::config::{Config, TranslationConfig};
use crate::core::cpu::CpuState;
use crate::core::model::instantiate;
use crate::debug::Breakpoints;
use crate::ir::interp::{BlockExit, execute};
use crate::isa::decoder::InstructionDecoder;
use crate::isa::rv64i::Rv64iDecoder;
use crate::memory::{GuestMemory, Perms};
use crate::sim::loader::{self, LoadedImage};
use crate::stats::TranslationStats;
use crate::translate::builder::{BlockRequest, TranslationEnv, translate_block};
use crate::translate::block::{DebugKey, TranslationBlock};
use crate::translate::context::CompileFlags;

/// Why [`Engine::run`] returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Translated code raised a guest exception.
    Trap {
        /// The exception.
        trap: Trap,
        /// PC of the trapping instruction.
        pc: VirtAddr,
    },
    /// A breakpoint was hit or a single step completed; carries the PC to resume at.
    Debug(VirtAddr),
    /// An exit was requested through [`Engine::exit_handle`].
    Interrupted,
    /// The block budget given to [`Engine::run`] ran out.
    BlockLimit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trap { trap, pc } => write!(f, "trap {trap} at {pc}"),
            Self::Debug(pc) => write!(f, "debug stop at {pc}"),
            Self::Interrupted => write!(f, "interrupted"),
            Self::BlockLimit => write!(f, "block limit reached"),
        }
    }
}

/// Top-level dispatcher: CPU state, guest memory and the code cache.
pub struct Engine {
    cpu: CpuState,
    memory: GuestMemory,
    decoder: Box<dyn InstructionDecoder>,
    cache: Arc<CodeCache>,
    breakpoints: Breakpoints,
    singlestep: bool,
    force_single_insn: bool,
    exit_request: Arc<AtomicBool>,
    translation: TranslationConfig,
    trace_blocks: bool,
    ram_base: u64,
    stats: TranslationStats,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("pc", &self.cpu.pc())
            .field("model", &self.cpu.model().name)
            .field("cached_blocks", &self.cache.len())
            .field("breakpoints", &self.breakpoints.len())
            .field("singlestep", &self.singlestep)
            .field("force_single_insn", &self.force_single_insn)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an engine from `config`: instantiates the CPU model, maps RAM and
    /// installs the configured breakpoints.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut cpu = instantiate(&config.general.model)?;
        cpu.set_pc(VirtAddr::new(config.general.start_pc));

        let mut memory = GuestMemory::new();
        memory.map(
            config.memory.ram_base,
            config.memory.ram_size,
            Perms::RWX.with_user(),
        )?;

        let mut breakpoints = Breakpoints::new();
        for &addr in &config.debug.breakpoints {
            let _ = breakpoints.insert(VirtAddr::new(addr));
        }

        debug!(
            model = %config.general.model,
            ram_base = %VirtAddr::new(config.memory.ram_base),
            ram_size = config.memory.ram_size,
            "engine created"
        );

        Ok(Self {
            cpu,
            memory,
            decoder: Box::new(Rv64iDecoder::new()),
            cache: Arc::new(CodeCache::new()),
            breakpoints,
            singlestep: config.debug.singlestep,
            force_single_insn: config.debug.force_single_insn,
            exit_request: Arc::new(AtomicBool::new(false)),
            translation: config.translation.clone(),
            trace_blocks: config.general.trace_blocks,
            ram_base: config.memory.ram_base,
            stats: TranslationStats::default(),
        })
    }

    /// Shares `cache` with other engines instead of a private one.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<CodeCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Replaces the instruction decoder.
    #[must_use]
    pub fn with_decoder(mut self, decoder: Box<dyn InstructionDecoder>) -> Self {
        self.decoder = decoder;
        self.cache.flush();
        self
    }

    /// CPU state.
    pub const fn cpu(&self) -> &CpuState {
        &self.cpu
    }

    /// Mutable CPU state.
    pub const fn cpu_mut(&mut self) -> &mut CpuState {
        &mut self.cpu
    }

    /// Guest memory.
    pub const fn memory(&self) -> &GuestMemory {
        &self.memory
    }

    /// Mutable guest memory. Writes made through it are picked up by the next
    /// [`Engine::run`] and invalidate the affected blocks.
    pub const fn memory_mut(&mut self) -> &mut GuestMemory {
        &mut self.memory
    }

    /// The code cache.
    pub const fn cache(&self) -> &Arc<CodeCache> {
        &self.cache
    }

    /// Dispatcher statistics.
    pub const fn stats(&self) -> &TranslationStats {
        &self.stats
    }

    /// Current breakpoints.
    pub const fn breakpoints(&self) -> &Breakpoints {
        &self.breakpoints
    }

    /// Handle that stops [`Engine::run`] before its next block when set.
    pub fn exit_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.exit_request)
    }

    /// Requests the running dispatch loop to return [`StopReason::Interrupted`].
    pub fn request_exit(&self) {
        self.exit_request.store(true, Ordering::Release);
    }

    /// Loads a program image (raw binaries go to the RAM base) and points the PC
    /// at its entry.
    pub fn load_image(&mut self, path: &Path) -> Result<LoadedImage, Error> {
        let image = loader::load_image(&mut self.memory, path, self.ram_base)?;
        self.cpu.set_pc(image.entry);
        self.invalidate_written();
        Ok(image)
    }

    /// Adds a breakpoint and drops the block that covers it.
    pub fn add_breakpoint(&mut self, addr: VirtAddr) -> bool {
        let added = self.breakpoints.insert(addr);
        if added {
            self.invalidate(addr.val(), INSTRUCTION_WIDTH);
        }
        added
    }

    /// Removes a breakpoint and drops the block that covers it.
    pub fn remove_breakpoint(&mut self, addr: VirtAddr) -> bool {
        let removed = self.breakpoints.remove(addr);
        if removed {
            self.invalidate(addr.val(), INSTRUCTION_WIDTH);
        }
        removed
    }

    /// Toggles single-step. Blocks built under the other setting are flushed.
    pub fn set_singlestep(&mut self, on: bool) {
        if self.singlestep != on {
            self.singlestep = on;
            self.cache.flush();
        }
    }

    /// Toggles one-instruction-per-block mode. Existing blocks are flushed.
    pub fn set_force_single_insn(&mut self, on: bool) {
        if self.force_single_insn != on {
            self.force_single_insn = on;
            self.cache.flush();
        }
    }

    /// Returns the block starting at `pc`, translating it on a miss.
    pub fn block_at(&mut self, pc: VirtAddr) -> CachedBlock {
        if let Some(block) = self.cache.lookup(pc)
            && self.fits(&block)
        {
            return block;
        }

        let snapshot = self
            .breakpoints
            .snapshot(self.singlestep, self.force_single_insn);
        let env = TranslationEnv {
            fetch: &self.memory,
            decoder: self.decoder.as_ref(),
            breakpoints: &snapshot,
            force_single_insn: self.force_single_insn,
            op_buffer_capacity: self.translation.op_buffer_capacity,
        };
        let req = BlockRequest {
            pc,
            cflags: CompileFlags::with_count(self.translation.max_insns),
            mem_mode: self.cpu.privilege,
            singlestep: self.singlestep,
        };
        let block = translate_block(&self.cpu, &env, &req);

        self.stats.blocks_translated += 1;
        self.stats.insns_translated += u64::from(block.icount());
        if self.trace_blocks {
            info!("translated\n{block}");
        }
        self.cache.insert(block)
    }

    /// Runs blocks until a stop condition or until `max_blocks` blocks have run.
    pub fn run(&mut self, max_blocks: u64) -> StopReason {
        info!(pc = %self.cpu.pc(), max_blocks, "dispatch starting");
        let reason = self.dispatch(max_blocks);
        info!(pc = %self.cpu.pc(), %reason, "dispatch stopped");
        reason
    }

    fn dispatch(&mut self, max_blocks: u64) -> StopReason {
        // Host writes made since the last run.
        self.invalidate_written();
        let mut next: Option<CachedBlock> = None;

        for _ in 0..max_blocks {
            if self.exit_request.swap(false, Ordering::AcqRel) {
                return StopReason::Interrupted;
            }

            let block = match next.take() {
                Some(block) => block,
                None => self.block_at(self.cpu.pc()),
            };
            let links: [Option<CachedBlock>; JUMP_SLOTS] = if self.translation.chaining {
                std::array::from_fn(|slot| {
                    self.cache
                        .resolve_link(&block, slot)
                        .filter(|target| self.fits(target))
                })
            } else {
                Default::default()
            };

            self.stats.blocks_executed += 1;
            let exit = execute(&block, &mut self.cpu, &mut self.memory, |slot| {
                links.get(slot).is_some_and(Option::is_some)
            });
            self.invalidate_written();

            match exit {
                BlockExit::Dispatch => self.stats.dispatcher_returns += 1,
                BlockExit::Link { slot } => {
                    self.stats.dispatcher_returns += 1;
                    let target = self.block_at(self.cpu.pc());
                    if self.translation.chaining && self.cache.link(&block, slot, &target) {
                        self.stats.links_made += 1;
                    }
                    next = Some(target);
                }
                BlockExit::Linked { slot } => {
                    self.stats.chained_transitions += 1;
                    next = links.get(slot).cloned().flatten();
                }
                BlockExit::Exception { code, tval } => {
                    self.stats.exceptions += 1;
                    let pc = self.cpu.pc();
                    let trap = Trap::from_cause(code, tval, pc.val());
                    warn!(%pc, %trap, "guest exception");
                    return StopReason::Trap { trap, pc };
                }
                BlockExit::Debug => {
                    self.stats.debug_stops += 1;
                    return StopReason::Debug(self.cpu.pc());
                }
            }

            // A store in the block may have replaced the successor.
            let pc = self.cpu.pc();
            next = next.filter(|b| b.pc() == pc && self.cache.is_current(b));
        }

        StopReason::BlockLimit
    }

    /// Whether a cached block was built the way this engine would build it now.
    /// Another engine sharing the cache may have translated it under a
    /// different privilege, debug mode or breakpoint set.
    fn fits(&self, block: &TranslationBlock) -> bool {
        block.mem_mode() == self.cpu.privilege
            && block.debug_key()
                == DebugKey {
                    singlestep: self.singlestep,
                    force_single_insn: self.force_single_insn,
                    breakpoint: self.breakpoints.first_in(block.pc(), block.end()),
                }
    }

    fn invalidate(&mut self, addr: u64, len: u64) {
        let removed = self.cache.invalidate_range(addr, len);
        self.stats.invalidations += removed as u64;
    }

    fn invalidate_written(&mut self) {
        for page in self.memory.take_written_pages() {
            self.invalidate(page, PAGE_SIZE);
        }
    }
}
