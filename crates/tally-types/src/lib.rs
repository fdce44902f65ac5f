//! Foundation types for the Tally ledger.
//!
//! This crate provides the data model shared by every other Tally crate:
//! content digests, the logical game clock, resource deltas, ledger entries,
//! and sealed blocks.
//!
//! # Key Types
//!
//! - [`Digest`] — 256-bit content digest with hex round-tripping
//! - [`GameTime`] — logical clock (`day`/`tick` with an optional global tick)
//! - [`ResourceDelta`] — exact-integer resource movement
//! - [`EntryBody`] / [`LedgerEntry`] — a single content-addressed event
//! - [`BlockHeader`] / [`LedgerBlock`] — a sealed, Merkle-committed batch
//! - [`ChainHead`] — the ledger's single mutable pointer (latest hash + height)

pub mod block;
pub mod digest;
pub mod entry;
pub mod error;
pub mod resource;
pub mod time;

pub use block::{BlockHeader, ChainHead, LedgerBlock, BLOCK_VERSION};
pub use digest::Digest;
pub use entry::{EntryBody, EntryKind, ExtPayload, LedgerEntry};
pub use error::TypeError;
pub use resource::ResourceDelta;
pub use time::GameTime;
