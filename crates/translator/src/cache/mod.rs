//! Shared translation cache.
//!
//! The cache maps a guest PC to the block translated from it. It is shared
//! between dispatchers behind an `RwLock`, so readers always observe whole
//! blocks.
//!
//! Every insertion is stamped with a fresh generation. A chain link remembers
//! the generation of its target, so a link whose target was replaced or
//! invalidated simply stops resolving; no back-pointers need to be patched.

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace};

use crate::common::constants::{JUMP_SLOTS, PAGE_MASK};
use crate::common::VirtAddr;
use crate::translate::block::TranslationBlock;

/// A block as stored in the cache, tagged with its generation.
#[derive(Clone, Debug)]
pub struct CachedBlock {
    block: Arc<TranslationBlock>,
    generation: u64,
}

impl CachedBlock {
    /// Generation stamp assigned at insertion.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The shared block.
    pub const fn block(&self) -> &Arc<TranslationBlock> {
        &self.block
    }
}

impl Deref for CachedBlock {
    type Target = TranslationBlock;

    fn deref(&self) -> &Self::Target {
        &self.block
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LinkTarget {
    pc: u64,
    generation: u64,
}

#[derive(Debug, Default)]
struct Inner {
    blocks: HashMap<u64, CachedBlock>,
    /// Outgoing links keyed by the source block's generation.
    links: HashMap<u64, [Option<LinkTarget>; JUMP_SLOTS]>,
    next_generation: u64,
}

impl Inner {
    fn is_current(&self, pc: u64, generation: u64) -> bool {
        self.blocks
            .get(&pc)
            .is_some_and(|b| b.generation == generation)
    }

    fn remove(&mut self, pc: u64) -> Option<CachedBlock> {
        let old = self.blocks.remove(&pc)?;
        let _ = self.links.remove(&old.generation);
        Some(old)
    }
}

/// Thread-safe, generation-tagged code cache.
#[derive(Debug, Default)]
pub struct CodeCache {
    inner: RwLock<Inner>,
}

impl CodeCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts `block`, replacing any block at the same PC.
    pub fn insert(&self, block: TranslationBlock) -> CachedBlock {
        let mut inner = self.write();
        inner.next_generation += 1;
        let cached = CachedBlock {
            block: Arc::new(block),
            generation: inner.next_generation,
        };
        let pc = cached.pc().val();
        if let Some(old) = inner.remove(pc) {
            trace!(pc = %cached.pc(), old = old.generation, "replacing block");
        }
        let _ = inner.blocks.insert(pc, cached.clone());
        cached
    }

    /// Returns the current block translated from `pc`.
    pub fn lookup(&self, pc: VirtAddr) -> Option<CachedBlock> {
        self.read().blocks.get(&pc.val()).cloned()
    }

    /// Returns `true` when `block` is still the current entry for its PC.
    pub fn is_current(&self, block: &CachedBlock) -> bool {
        self.read().is_current(block.pc().val(), block.generation)
    }

    /// Patches jump slot `slot` of `from` to enter `to` directly.
    ///
    /// Returns `false` (and links nothing) when either block is no longer current
    /// or `slot` is out of range.
    pub fn link(&self, from: &CachedBlock, slot: usize, to: &CachedBlock) -> bool {
        if slot >= JUMP_SLOTS {
            return false;
        }
        let mut inner = self.write();
        if !inner.is_current(from.pc().val(), from.generation)
            || !inner.is_current(to.pc().val(), to.generation)
        {
            return false;
        }
        let slots = inner.links.entry(from.generation).or_default();
        slots[slot] = Some(LinkTarget {
            pc: to.pc().val(),
            generation: to.generation,
        });
        trace!(from = %from.pc(), slot, to = %to.pc(), "linked");
        true
    }

    /// Follows jump slot `slot` of `from`, if it is linked to a block that is
    /// still current.
    pub fn resolve_link(&self, from: &CachedBlock, slot: usize) -> Option<CachedBlock> {
        let inner = self.read();
        let target = inner.links.get(&from.generation)?.get(slot).copied().flatten()?;
        inner
            .blocks
            .get(&target.pc)
            .filter(|b| b.generation == target.generation)
            .cloned()
    }

    /// Drops every block whose pages intersect the pages of `[addr, addr + len)`.
    ///
    /// Returns the number of blocks removed.
    pub fn invalidate_range(&self, addr: u64, len: u64) -> usize {
        if len == 0 {
            return 0;
        }
        let first = addr & PAGE_MASK;
        let last = addr.saturating_add(len - 1) & PAGE_MASK;
        let mut inner = self.write();
        let doomed: Vec<u64> = inner
            .blocks
            .values()
            .filter(|b| {
                let (lo, hi) = b.page_span();
                lo <= last && first <= hi
            })
            .map(|b| b.pc().val())
            .collect();
        for pc in &doomed {
            let _ = inner.remove(*pc);
        }
        if !doomed.is_empty() {
            debug!(addr = %VirtAddr::new(addr), len, removed = doomed.len(), "invalidated blocks");
        }
        doomed.len()
    }

    /// Drops every block.
    pub fn flush(&self) {
        let mut inner = self.write();
        let n = inner.blocks.len();
        inner.blocks.clear();
        inner.links.clear();
        debug!(removed = n, "flushed code cache");
    }

    /// Number of cached blocks.
    pub fn len(&self) -> usize {
        self.read().blocks.len()
    }

    /// Returns `true` when the cache holds no block.
    pub fn is_empty(&self) -> bool {
        self.read().blocks.is_empty()
    }
}
