use crate::ledger::chain::Block;
use std::collections::HashMap;

/// Outcome of replaying a chain from genesis.
#[derive(Debug, Default)]
pub struct Replay {
    /// Final balance of every account that appears on the chain.
    pub balances: HashMap<String, i64>,
    /// True if any account balance dipped below zero at any point of the
    /// replay, in chain and intra-block order.
    pub overdrawn: bool,
}

/// Replays every transaction in chain and intra-block order.
///
/// Transactions in the first block are mints: the receiver is credited and
/// nobody is debited, which is how a self-transfer genesis establishes an
/// initial supply. Every later transaction debits the sender and credits the
/// receiver.
pub fn replay(chain: &[Block]) -> Replay {
    let mut replay = Replay::default();

    for (position, block) in chain.iter().enumerate() {
        let minting = position == 0;
        for tx in &block.transactions {
            // Candidate chains are untrusted; saturate instead of overflowing.
            let amount = i64::try_from(tx.amount).unwrap_or(i64::MAX);
            if !minting {
                let sender_balance = replay.balances.entry(tx.sender.clone()).or_insert(0);
                *sender_balance = sender_balance.saturating_sub(amount);
                if *sender_balance < 0 {
                    replay.overdrawn = true;
                }
            }
            let receiver_balance = replay.balances.entry(tx.receiver.clone()).or_insert(0);
            *receiver_balance = receiver_balance.saturating_add(amount);
        }
    }

    replay
}
