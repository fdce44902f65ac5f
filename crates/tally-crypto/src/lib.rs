//! Cryptographic primitives for the Tally ledger.
//!
//! Provides canonical deterministic encoding, domain-separated SHA-256
//! hashing, binary Merkle trees with inclusion proofs, and block hash-chain
//! verification.
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod canonical;
pub mod chain;
pub mod error;
pub mod hasher;
pub mod merkle;

pub use canonical::{encode, encode_value};
pub use chain::{block_hash, header_hash, ChainError, ChainVerifier};
pub use error::EncodingError;
pub use hasher::DomainHasher;
pub use merkle::{leaf_hash, node_hash, verify_steps, MerkleStep, MerkleTree, Side};
