//! Error types for Paychain

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    /// The transaction's signature does not verify against its claimed sender.
    #[error("Signature invalid: transaction is not signed by its claimed sender")]
    SignatureInvalid,

    /// Admitting the transaction would drive the sender's balance negative
    /// given last-committed chain state.
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u64, available: i64 },

    #[error("Cryptographic error: {0}")]
    CryptoError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The nonce search was aborted through the miner's cancellation flag.
    #[error("Mining cancelled")]
    MiningCancelled,

    #[error("Config error: {0}")]
    ConfigError(String),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
