use crate::ledger::balances;
use crate::ledger::chain::Block;

/// Total integrity verdict over an arbitrary candidate chain.
///
/// Two independent checks, both required:
/// hash linkage alone does not catch an internally consistent chain built
/// from overspending transactions appended out-of-band, and balance replay
/// alone does not catch a silent field edit inside an already-appended block
/// (the edit breaks the *next* block's `previous_hash`, not the edited
/// block's own consistency).
///
/// Designed to be called on attacker-controlled or corrupted input: returns
/// false on any defect, never panics.
pub fn valid_chain(chain: &[Block]) -> bool {
    // Index contiguity from 0
    for (position, block) in chain.iter().enumerate() {
        if block.index != position as u64 {
            return false;
        }
    }

    // Hash linkage: every block must commit to its predecessor's hash
    for i in 1..chain.len() {
        let previous_hash = match chain[i - 1].hash() {
            Ok(hash) => hash,
            Err(_) => return false,
        };
        if chain[i].previous_hash != previous_hash {
            return false;
        }
    }

    // Balance replay: no account may go negative at any point
    !balances::replay(chain).overdrawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;
    use crate::ledger::chain::Ledger;
    use crate::transaction::Transaction;

    fn three_block_ledger() -> (KeyPair, Ledger) {
        let alice = KeyPair::generate();
        let tx0 = Transaction::create(&alice, &alice.account_id(), 100).unwrap();
        let mut ledger = Ledger::new(vec![tx0]).unwrap();

        for _ in 0..2 {
            let tx = Transaction::create(&alice, &alice.account_id(), 10).unwrap();
            ledger.add_transaction(tx).unwrap();
            let prev_hash = ledger.last_block_hash().unwrap();
            ledger.new_block(prev_hash).unwrap();
        }
        (alice, ledger)
    }

    #[test]
    fn test_honest_chain_is_valid() {
        let (_, ledger) = three_block_ledger();
        assert_eq!(ledger.blocks().len(), 3);
        assert!(valid_chain(ledger.blocks()));
    }

    #[test]
    fn test_empty_chain_is_valid() {
        assert!(valid_chain(&[]));
    }

    #[test]
    fn test_edited_amount_breaks_linkage() {
        let (_, mut ledger) = three_block_ledger();
        ledger.raw_blocks_mut()[1].transactions[0].amount = 20;
        assert!(!valid_chain(ledger.blocks()));
    }

    #[test]
    fn test_edited_timestamp_breaks_linkage() {
        let (_, mut ledger) = three_block_ledger();
        ledger.raw_blocks_mut()[1].timestamp += 1;
        assert!(!valid_chain(ledger.blocks()));
    }

    #[test]
    fn test_edited_nonce_breaks_linkage() {
        let (_, mut ledger) = three_block_ledger();
        ledger.raw_blocks_mut()[1].nonce = 99;
        assert!(!valid_chain(ledger.blocks()));
    }

    #[test]
    fn test_rewritten_previous_hash_breaks_linkage() {
        let (_, mut ledger) = three_block_ledger();
        ledger.raw_blocks_mut()[2].previous_hash = "ff".repeat(32);
        assert!(!valid_chain(ledger.blocks()));
    }

    #[test]
    fn test_index_gap_is_invalid() {
        let (_, mut ledger) = three_block_ledger();
        ledger.raw_blocks_mut()[2].index = 5;
        assert!(!valid_chain(ledger.blocks()));
    }

    #[test]
    fn test_out_of_band_overspend_is_invalid() {
        // A block appended around add_transaction, with consistent hash
        // linkage, is still caught by the balance replay.
        let alice = KeyPair::generate();
        let bob = KeyPair::generate();
        let tx0 = Transaction::create(&alice, &alice.account_id(), 100).unwrap();
        let mut ledger = Ledger::new(vec![tx0]).unwrap();

        let overspend = Transaction::create(&alice, &bob.account_id(), 500).unwrap();
        let previous_hash = ledger.last_block_hash().unwrap();
        let rogue = crate::ledger::chain::Block {
            nonce: 0,
            index: 1,
            timestamp: 123_456_789,
            transactions: vec![overspend],
            previous_hash,
        };
        ledger.raw_blocks_mut().push(rogue);

        assert!(!valid_chain(ledger.blocks()));
    }
}
