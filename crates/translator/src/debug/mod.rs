//! Debugger control.
//!
//! Breakpoints are read on every instruction the builder translates but change
//! rarely, so the set is copy-on-write: each build takes a [`DebugSnapshot`] that
//! stays fixed while the set is edited concurrently.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::common::VirtAddr;

/// Breakpoint lookup consumed by the block builder.
pub trait BreakpointQuery {
    /// Returns `true` when a breakpoint is set at `addr`.
    fn is_breakpoint_at(&self, addr: VirtAddr) -> bool;
}

/// Copy-on-write breakpoint set.
#[derive(Clone, Debug, Default)]
pub struct Breakpoints {
    addrs: Arc<BTreeSet<u64>>,
}

impl Breakpoints {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a breakpoint, returning `false` if it was already present.
    pub fn insert(&mut self, addr: VirtAddr) -> bool {
        if self.addrs.contains(&addr.val()) {
            return false;
        }
        Arc::make_mut(&mut self.addrs).insert(addr.val())
    }

    /// Removes a breakpoint, returning `false` if it was not present.
    pub fn remove(&mut self, addr: VirtAddr) -> bool {
        if !self.addrs.contains(&addr.val()) {
            return false;
        }
        Arc::make_mut(&mut self.addrs).remove(&addr.val())
    }

    /// Number of breakpoints.
    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    /// Returns `true` when no breakpoint is set.
    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    /// Iterates over breakpoint addresses in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = VirtAddr> + '_ {
        self.addrs.iter().copied().map(VirtAddr::new)
    }

    /// Lowest breakpoint in `[start, end)`. A range that wraps past the top of
    /// the address space is searched up to the end of it.
    pub fn first_in(&self, start: VirtAddr, end: VirtAddr) -> Option<VirtAddr> {
        let found = if start.val() < end.val() {
            self.addrs.range(start.val()..end.val()).next()
        } else {
            self.addrs.range(start.val()..).next()
        };
        found.copied().map(VirtAddr::new)
    }

    /// Freezes the current set together with the debug flags for one build.
    pub fn snapshot(&self, singlestep: bool, force_single_insn: bool) -> DebugSnapshot {
        DebugSnapshot {
            breakpoints: Arc::clone(&self.addrs),
            singlestep,
            force_single_insn,
        }
    }
}

impl BreakpointQuery for Breakpoints {
    fn is_breakpoint_at(&self, addr: VirtAddr) -> bool {
        self.addrs.contains(&addr.val())
    }
}

/// Debug state frozen for the duration of one block build.
#[derive(Clone, Debug, Default)]
pub struct DebugSnapshot {
    breakpoints: Arc<BTreeSet<u64>>,
    /// Single-step mode: every block holds one instruction and ends in a debug trap.
    pub singlestep: bool,
    /// Global one-instruction-per-block mode, without debug traps.
    pub force_single_insn: bool,
}

impl BreakpointQuery for DebugSnapshot {
    fn is_breakpoint_at(&self, addr: VirtAddr) -> bool {
        self.breakpoints.contains(&addr.val())
    }
}
