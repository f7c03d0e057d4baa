//! Translation statistics.
//!
//! Counters maintained by the dispatcher. It tracks:
//! 1. **Translation:** Blocks and guest instructions translated.
//! 2. **Dispatch:** Blocks executed, chained transitions, returns to the dispatcher.
//! 3. **Cache Maintenance:** Links patched and blocks invalidated.
//! 4. **Guest Events:** Exceptions and debug stops observed.

use std::time::Instant;

/// Dispatcher statistics.
#[derive(Clone, Debug)]
pub struct TranslationStats {
    start_time: Instant,
    /// Blocks built by the translator.
    pub blocks_translated: u64,
    /// Guest instructions covered by translated blocks.
    pub insns_translated: u64,
    /// Blocks run (including chained entries).
    pub blocks_executed: u64,
    /// Block-to-block transitions that bypassed the lookup.
    pub chained_transitions: u64,
    /// Block exits that went back to the dispatcher lookup.
    pub dispatcher_returns: u64,
    /// Jump slots patched.
    pub links_made: u64,
    /// Blocks dropped by invalidation.
    pub invalidations: u64,
    /// Guest exceptions raised by translated code.
    pub exceptions: u64,
    /// Debug stops (breakpoints and single-steps).
    pub debug_stops: u64,
}

impl Default for TranslationStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            blocks_translated: 0,
            insns_translated: 0,
            blocks_executed: 0,
            chained_transitions: 0,
            dispatcher_returns: 0,
            links_made: 0,
            invalidations: 0,
            exceptions: 0,
            debug_stops: 0,
        }
    }
}

impl TranslationStats {
    /// Mean guest instructions per translated block.
    pub fn avg_block_len(&self) -> f64 {
        if self.blocks_translated == 0 {
            0.0
        } else {
            self.insns_translated as f64 / self.blocks_translated as f64
        }
    }

    /// Fraction of block entries reached through a chained jump.
    pub fn chain_ratio(&self) -> f64 {
        if self.blocks_executed == 0 {
            0.0
        } else {
            self.chained_transitions as f64 / self.blocks_executed as f64
        }
    }

    /// Prints the statistics summary to stdout.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        println!("\n==========================================================");
        println!("RISC-V TRANSLATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("tb.translated            {}", self.blocks_translated);
        println!("tb.insns                 {}", self.insns_translated);
        println!("tb.avg_len               {:.2}", self.avg_block_len());
        println!("----------------------------------------------------------");
        println!("DISPATCH");
        println!("  tb.executed            {}", self.blocks_executed);
        println!(
            "  tb.chained             {} ({:.2}%)",
            self.chained_transitions,
            self.chain_ratio() * 100.0
        );
        println!("  dispatcher.returns     {}", self.dispatcher_returns);
        println!("  links.made             {}", self.links_made);
        println!("  tb.invalidated         {}", self.invalidations);
        println!("----------------------------------------------------------");
        println!("GUEST EVENTS");
        println!("  exceptions             {}", self.exceptions);
        println!("  debug.stops            {}", self.debug_stops);
        println!("==========================================================");
    }
}
