//! Canonical serialization and hashing.
//!
//! The same digest function covers block hashes and transaction signing
//! payloads, so the miner, the validator, and the authenticator can never
//! disagree about what a record hashes to.

use crate::error::Result;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Serializes a record as canonical JSON: object keys sorted
/// lexicographically, integers as decimal digits, strings verbatim,
/// sequences element-wise in order.
///
/// Routing through `serde_json::Value` is what sorts the keys: the default
/// `serde_json::Map` is backed by a BTreeMap, so serialization order is
/// independent of struct field order.
pub fn canonical_json<T: Serialize>(record: &T) -> Result<String> {
    let value = serde_json::to_value(record)?;
    Ok(serde_json::to_string(&value)?)
}

/// SHA-256 over the canonical serialization, rendered as 64 lowercase hex
/// characters. Structurally equal records hash identically; any change to
/// any field value changes the digest.
pub fn hash_record<T: Serialize>(record: &T) -> Result<String> {
    let serialized = canonical_json(record)?;
    let digest = Sha256::digest(serialized.as_bytes());
    Ok(hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Record {
        amount: u64,
        sender: String,
    }

    // Same logical record, fields declared in the opposite order.
    #[derive(Serialize)]
    struct RecordReversed {
        sender: String,
        amount: u64,
    }

    #[test]
    fn test_hash_is_deterministic() {
        let record = Record {
            amount: 42,
            sender: "alice".to_string(),
        };
        assert_eq!(hash_record(&record).unwrap(), hash_record(&record).unwrap());
    }

    #[test]
    fn test_hash_independent_of_field_order() {
        let a = Record {
            amount: 42,
            sender: "alice".to_string(),
        };
        let b = RecordReversed {
            sender: "alice".to_string(),
            amount: 42,
        };
        assert_eq!(hash_record(&a).unwrap(), hash_record(&b).unwrap());
        assert_eq!(canonical_json(&a).unwrap(), canonical_json(&b).unwrap());
    }

    #[test]
    fn test_any_field_change_alters_hash() {
        let base = Record {
            amount: 42,
            sender: "alice".to_string(),
        };
        let changed_amount = Record {
            amount: 43,
            sender: "alice".to_string(),
        };
        let changed_sender = Record {
            amount: 42,
            sender: "alicf".to_string(),
        };
        let base_hash = hash_record(&base).unwrap();
        assert_ne!(base_hash, hash_record(&changed_amount).unwrap());
        assert_ne!(base_hash, hash_record(&changed_sender).unwrap());
    }

    #[test]
    fn test_hash_shape() {
        let hash = hash_record(&Record {
            amount: 1,
            sender: "a".to_string(),
        })
        .unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_canonical_json_sorts_keys() {
        let json = canonical_json(&RecordReversed {
            sender: "alice".to_string(),
            amount: 7,
        })
        .unwrap();
        assert_eq!(json, r#"{"amount":7,"sender":"alice"}"#);
    }
}
