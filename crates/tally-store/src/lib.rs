//! Persistence contract for the Tally ledger.
//!
//! The ledger engine depends only on the [`LedgerStore`] trait; any durable
//! backend (file, key-value store, database) satisfying the contract is a
//! valid substitute for the in-memory reference implementation.
//!
//! # Design Rules
//!
//! 1. Blocks are immutable once written — the ledger is append-only.
//! 2. A block is only accepted if it chains to the current head; the head
//!    advances atomically with the accepted block.
//! 3. Concurrent reads are always safe (sealed blocks never change).
//! 4. The store never interprets entry contents — it indexes and returns
//!    them as given.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use traits::{EntryRecord, LedgerStore};
