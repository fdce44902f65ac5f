use serde::{Deserialize, Serialize};
use tally_types::{ChainHead, Digest, LedgerBlock, LedgerEntry};

use crate::error::StoreResult;

/// A stored entry together with its block location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// The entry as sealed.
    pub entry: LedgerEntry,
    /// Index of the owning block.
    pub block_index: u64,
    /// The entry's leaf position within the block's Merkle tree.
    pub leaf_index: u64,
}

/// Persistence contract the ledger engine depends on.
///
/// Implementations must satisfy these invariants:
/// - Blocks are immutable once written; `put_block` never overwrites.
/// - `put_block` only accepts a block whose `prev_block_hash` matches the
///   current head (or the zero digest when the store is empty), and advances
///   the head together with the accepted block.
/// - Head reads and writes are isolated: a reader observes either the old or
///   the new head, never a torn value.
/// - All I/O errors are propagated, never silently ignored. Durability and
///   retry policy live here, not in the engine.
pub trait LedgerStore: Send + Sync {
    /// Persist a sealed block and advance the head.
    fn put_block(&self, block: &LedgerBlock) -> StoreResult<()>;

    /// Fetch a block by chain index. `Ok(None)` if no such block exists.
    fn block_by_index(&self, index: u64) -> StoreResult<Option<LedgerBlock>>;

    /// Fetch a block by its chained hash. `Ok(None)` if no such block exists.
    fn block_by_hash(&self, hash: &Digest) -> StoreResult<Option<LedgerBlock>>;

    /// The current head, or `Ok(None)` for an empty store.
    fn head(&self) -> StoreResult<Option<ChainHead>>;

    /// Index an entry's location within its sealed block.
    fn put_entry(&self, entry: &LedgerEntry, block_index: u64, leaf_index: u64)
        -> StoreResult<()>;

    /// Look up an entry and its location by id. `Ok(None)` on a miss.
    fn entry(&self, id: &Digest) -> StoreResult<Option<EntryRecord>>;
}
