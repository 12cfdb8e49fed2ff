//! Paychain - a minimal proof-of-work ledger with signed account transfers
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`ledger`] - Chain, pending pool, balance replay, and validation
//! - [`transaction`] - Signed value-transfer transactions
//!
//! ## Consensus
//! - [`miner`] - Block closers: immediate baseline and proof-of-work
//!
//! ## Cryptography
//! - [`crypto`] - Key pairs, signatures, and the textual key codec (secp256k1)
//! - [`hashing`] - Canonical serialization and SHA-256 digests
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod ledger;
pub mod transaction;

// ============================================================================
// Consensus & Mining
// ============================================================================
pub mod miner;

// ============================================================================
// Cryptography
// ============================================================================
pub mod crypto;
pub mod hashing;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
