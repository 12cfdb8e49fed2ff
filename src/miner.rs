//! Block closing: the no-PoW baseline and the proof-of-work miner.
//!
//! Closing strategy is a capability the caller picks, not a ledger subclass:
//! [`ImmediateCloser`] appends the template as-is, [`PowMiner`] searches nonce
//! space until the block hash meets the difficulty predicate.

use crate::error::{ChainError, Result};
use crate::ledger::{Block, Ledger};
use crossbeam_channel::bounded;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default number of leading hex zeros a mined block hash must carry.
pub const DEFAULT_DIFFICULTY: usize = 5;

/// A SHA-256 hex digest has 64 characters, so more leading zeros than that
/// can never be satisfied.
pub const MAX_DIFFICULTY: usize = 64;

/// A closed block together with the wall-clock time spent closing it.
#[derive(Debug, Clone)]
pub struct ClosedBlock {
    pub block: Block,
    pub elapsed: Duration,
}

/// Strategy for freezing the pending pool into a chain block.
pub trait BlockCloser {
    /// Closes the ledger's pending pool into a new block and appends it.
    /// With `previous_hash` omitted, the last committed block's hash is used.
    fn close(&self, ledger: &mut Ledger, previous_hash: Option<String>) -> Result<ClosedBlock>;
}

/// Baseline closer without proof-of-work: the template is appended with its
/// nonce fixed at 0.
pub struct ImmediateCloser;

impl BlockCloser for ImmediateCloser {
    fn close(&self, ledger: &mut Ledger, previous_hash: Option<String>) -> Result<ClosedBlock> {
        let start = Instant::now();
        let block = ledger.block_template(previous_hash)?;
        ledger.commit_block(block.clone());
        Ok(ClosedBlock {
            block,
            elapsed: start.elapsed(),
        })
    }
}

/// Brute-force nonce search.
///
/// The digest has no exploitable gradient: incrementing the nonce by one
/// produces an unrelated hash, so exhaustive search is the only strategy and
/// the expected attempt count is `16^difficulty`. With more than one thread,
/// workers stride disjoint nonce residues over the same immutable template;
/// the first to satisfy the predicate wins and the rest shut down.
pub struct PowMiner {
    difficulty: usize,
    threads: usize,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for PowMiner {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

impl PowMiner {
    /// Difficulty is clamped to [`MAX_DIFFICULTY`]; anything above it would
    /// make the search loop forever on an unsatisfiable target.
    pub fn new(difficulty: usize) -> Self {
        PowMiner {
            difficulty: difficulty.min(MAX_DIFFICULTY),
            threads: 1,
            cancel: None,
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Cooperative cancellation hook: once the flag is set, the search stops
    /// and [`PowMiner::mine`] returns [`ChainError::MiningCancelled`].
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Mines the pending pool into a block and appends it, returning the
    /// block and the wall-clock time spent searching. Only the nonce varies
    /// during the search; the rest of the template is frozen up front.
    pub fn mine(&self, ledger: &mut Ledger, previous_hash: Option<String>) -> Result<ClosedBlock> {
        let template = ledger.block_template(previous_hash)?;

        let start = Instant::now();
        let block = if self.threads > 1 {
            self.search_parallel(&template)?
        } else {
            self.search_sequential(template)?
        };
        let elapsed = start.elapsed();

        debug!(
            "mined block {} with nonce {} in {:.2}s",
            block.index,
            block.nonce,
            elapsed.as_secs_f64()
        );
        ledger.commit_block(block.clone());
        Ok(ClosedBlock { block, elapsed })
    }

    fn target(&self) -> String {
        "0".repeat(self.difficulty)
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn search_sequential(&self, mut block: Block) -> Result<Block> {
        let target = self.target();
        let mut attempts: u64 = 0;

        loop {
            if self.cancelled() {
                return Err(ChainError::MiningCancelled);
            }

            let hash = block.hash()?;
            if hash.starts_with(&target) {
                return Ok(block);
            }

            block.nonce += 1;
            attempts += 1;
            if attempts % 1_000_000 == 0 {
                debug!("tried {} nonces, current hash {}", attempts, hash);
            }
        }
    }

    fn search_parallel(&self, template: &Block) -> Result<Block> {
        let target = self.target();
        let found = Arc::new(AtomicBool::new(false));
        let (result_tx, result_rx) = bounded::<Result<Block>>(self.threads);
        let stride = self.threads as u64;

        thread::scope(|scope| {
            for worker in 0..stride {
                let mut block = template.clone();
                block.nonce = worker;
                let found = Arc::clone(&found);
                let result_tx = result_tx.clone();
                let target = target.as_str();
                let cancel = self.cancel.clone();

                scope.spawn(move || loop {
                    if found.load(Ordering::Relaxed) {
                        return;
                    }
                    if cancel
                        .as_ref()
                        .is_some_and(|flag| flag.load(Ordering::Relaxed))
                    {
                        return;
                    }

                    match block.hash() {
                        Ok(hash) if hash.starts_with(target) => {
                            // First success wins; losers observe the flag.
                            if !found.swap(true, Ordering::Relaxed) {
                                let _ = result_tx.send(Ok(block));
                            }
                            return;
                        }
                        Ok(_) => block.nonce += stride,
                        Err(e) => {
                            if !found.swap(true, Ordering::Relaxed) {
                                let _ = result_tx.send(Err(e));
                            }
                            return;
                        }
                    }
                });
            }
        });

        match result_rx.try_recv() {
            Ok(result) => result,
            Err(_) => Err(ChainError::MiningCancelled),
        }
    }
}

impl BlockCloser for PowMiner {
    fn close(&self, ledger: &mut Ledger, previous_hash: Option<String>) -> Result<ClosedBlock> {
        self.mine(ledger, previous_hash)
    }
}
