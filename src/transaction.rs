//! Signed value-transfer transactions.
//!
//! A transaction is immutable once signed: the signature covers the canonical
//! serialization of every field except the signature itself, so any
//! post-signing edit makes `verify` fail deterministically.

use crate::crypto::{self, KeyPair};
use crate::error::Result;
use crate::hashing;
use serde::{Deserialize, Serialize};

/// A transfer of `amount` tokens from `sender` to `receiver`.
///
/// `sender` and `receiver` are public keys in their canonical string form,
/// `timestamp` is unix seconds, and `signature` is the hex-encoded compact
/// ECDSA signature over the canonical payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub amount: u64,
    pub timestamp: i64,
    pub signature: String,
}

/// The signed subset of a transaction. The signature field is excluded.
#[derive(Serialize)]
struct SigningPayload<'a> {
    sender: &'a str,
    receiver: &'a str,
    amount: u64,
    timestamp: i64,
}

impl Transaction {
    /// Builds and signs a transfer from the key pair's account to `receiver`,
    /// stamped with the current time.
    pub fn create(keypair: &KeyPair, receiver: &str, amount: u64) -> Result<Self> {
        Self::create_at(keypair, receiver, amount, chrono::Utc::now().timestamp())
    }

    /// Explicit-timestamp variant of [`Transaction::create`], for callers that
    /// need deterministic fixtures.
    pub fn create_at(
        keypair: &KeyPair,
        receiver: &str,
        amount: u64,
        timestamp: i64,
    ) -> Result<Self> {
        let sender = keypair.account_id();
        let payload = hashing::canonical_json(&SigningPayload {
            sender: &sender,
            receiver,
            amount,
            timestamp,
        })?;
        let signature = keypair.sign(payload.as_bytes())?;

        Ok(Transaction {
            sender,
            receiver: receiver.to_string(),
            amount,
            timestamp,
            signature: hex::encode(signature),
        })
    }

    /// Rebuilds the signable bytes from the transaction's *current* field
    /// values, so tampering shows up as a payload/signature mismatch.
    fn signable_message(&self) -> Result<Vec<u8>> {
        let payload = hashing::canonical_json(&SigningPayload {
            sender: &self.sender,
            receiver: &self.receiver,
            amount: self.amount,
            timestamp: self.timestamp,
        })?;
        Ok(payload.into_bytes())
    }

    /// Fail-closed signature check.
    ///
    /// Returns false (never panics, never errors out) on an absent or
    /// non-hex signature, an undecodable sender key, or a cryptographic
    /// mismatch. True only if the signature verifies against the
    /// reconstructed payload under the sender's public key.
    pub fn verify(&self) -> bool {
        if self.signature.is_empty() {
            return false;
        }
        let signature = match hex::decode(&self.signature) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        let message = match self.signable_message() {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        crypto::verify_signature(&self.sender, &message, &signature).is_ok()
    }
}
