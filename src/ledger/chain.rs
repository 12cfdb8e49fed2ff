use crate::error::{ChainError, Result};
use crate::hashing;
use crate::ledger::balances;
use crate::transaction::Transaction;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel `previous_hash` carried by block 0.
pub const GENESIS_PREVIOUS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// One block of the hash-linked chain. Field names are the wire names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub nonce: u64,
    pub index: u64,
    pub timestamp: i64,
    pub transactions: Vec<Transaction>,
    pub previous_hash: String,
}

impl Block {
    /// Canonical hash of the whole block, signature fields included.
    pub fn hash(&self) -> Result<String> {
        hashing::hash_record(self)
    }
}

/// The ledger owns the chain and the pending-transaction pool.
///
/// Blocks are append-only through this type's public contract; the only
/// mutable access to history is [`Ledger::raw_blocks_mut`], which exists for
/// test harnesses that simulate tampering.
pub struct Ledger {
    blocks: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Ledger {
    /// Creates a ledger whose genesis block carries `genesis_transactions`.
    ///
    /// Genesis transactions are mints (typically self-transfers) that
    /// establish initial balances. Their signatures must still verify.
    pub fn new(genesis_transactions: Vec<Transaction>) -> Result<Self> {
        for tx in &genesis_transactions {
            if !tx.verify() {
                return Err(ChainError::SignatureInvalid);
            }
        }

        let mut ledger = Ledger {
            blocks: Vec::new(),
            pending: genesis_transactions,
        };
        let genesis = ledger.block_template(Some(GENESIS_PREVIOUS_HASH.to_string()))?;
        ledger.commit_block(genesis);
        Ok(ledger)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Raw mutable handle to the backing block storage.
    ///
    /// Exists solely so test harnesses can simulate out-of-band corruption;
    /// production code paths go through [`Ledger::add_transaction`] and the
    /// block closers, and [`valid_chain`](crate::ledger::valid_chain) is what
    /// detects anything written through here.
    pub fn raw_blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    /// Canonical hash of the last committed block.
    pub fn last_block_hash(&self) -> Result<String> {
        // The chain is never empty: construction seals the genesis block.
        match self.blocks.last() {
            Some(block) => block.hash(),
            None => Ok(GENESIS_PREVIOUS_HASH.to_string()),
        }
    }

    /// Admits a transaction into the pending pool.
    ///
    /// Rejects with [`ChainError::SignatureInvalid`] unless the signature
    /// verifies, and with [`ChainError::InsufficientFunds`] if the sender's
    /// committed balance cannot cover the amount. Balances are computed
    /// against the last-committed chain only; pending transactions are not
    /// counted. Two pending transfers that are each affordable alone can
    /// therefore jointly overspend, which surfaces later through
    /// [`valid_chain`](crate::ledger::valid_chain). On rejection the pool is
    /// left untouched.
    pub fn add_transaction(&mut self, tx: Transaction) -> Result<()> {
        if !tx.verify() {
            return Err(ChainError::SignatureInvalid);
        }

        let available = self.get_balances().get(&tx.sender).copied().unwrap_or(0);
        // Clamp instead of casting: a plain `as i64` would wrap amounts above
        // i64::MAX negative and wave the overspend through.
        let amount = i64::try_from(tx.amount).unwrap_or(i64::MAX);
        if available < amount {
            return Err(ChainError::InsufficientFunds {
                required: tx.amount,
                available,
            });
        }

        info!(
            "admitted transfer of {} from {}..",
            tx.amount,
            &tx.sender[..8.min(tx.sender.len())]
        );
        self.pending.push(tx);
        Ok(())
    }

    /// Closes the pending pool into a block without proof-of-work: the nonce
    /// stays at 0 and the block is appended as-is. Baseline counterpart of
    /// the miner in [`crate::miner`].
    pub fn new_block(&mut self, previous_hash: String) -> Result<Block> {
        let block = self.block_template(Some(previous_hash))?;
        self.commit_block(block.clone());
        Ok(block)
    }

    /// Builds a candidate block from the pending pool with nonce 0.
    ///
    /// The pool is untouched until [`Ledger::commit_block`]; block closers
    /// adjust only the nonce of the returned template.
    pub fn block_template(&self, previous_hash: Option<String>) -> Result<Block> {
        let previous_hash = match previous_hash {
            Some(hash) => hash,
            None => self.last_block_hash()?,
        };

        Ok(Block {
            nonce: 0,
            index: self.blocks.len() as u64,
            timestamp: chrono::Utc::now().timestamp(),
            transactions: self.pending.clone(),
            previous_hash,
        })
    }

    /// Appends a closed block to the chain and clears the pending pool.
    /// The pool is cleared exactly once per closed block.
    pub fn commit_block(&mut self, block: Block) {
        info!(
            "sealed block {} with {} transaction(s)",
            block.index,
            block.transactions.len()
        );
        self.pending.clear();
        self.blocks.push(block);
    }

    /// Current balance of every account, derived by replaying the chain.
    /// Pure function of the committed chain; pending transactions do not
    /// appear here.
    pub fn get_balances(&self) -> HashMap<String, i64> {
        balances::replay(&self.blocks).balances
    }
}
