use serde::{Deserialize, Serialize};

use crate::digest::Digest;
use crate::entry::LedgerEntry;
use crate::time::GameTime;

/// Current block format version.
pub const BLOCK_VERSION: u16 = 1;

/// Header of a sealed block.
///
/// The header is what the block hash commits to (via its canonical
/// encoding); entries are committed indirectly through `merkle_root`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Block format version.
    pub version: u16,
    /// Height of this block in the chain (genesis is 0).
    pub index: u64,
    /// Time of the first entry in the sealing window.
    pub time_start: GameTime,
    /// End boundary of the sealing window.
    pub time_end: GameTime,
    /// Number of entries committed by this block.
    pub entry_count: u64,
    /// Merkle root over the leaf-hashed entry ids, in leaf order.
    pub merkle_root: Digest,
}

/// An immutable, sealed batch of entries.
///
/// Blocks are never mutated or deleted once sealed. `block[i + 1]` always
/// chains to `block[i]` via `prev_block_hash`; the genesis block chains to
/// [`Digest::zero`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerBlock {
    /// The committed header.
    pub header: BlockHeader,
    /// Hash of the previous block (zero for genesis).
    pub prev_block_hash: Digest,
    /// This block's chained hash.
    pub block_hash: Digest,
    /// The sealed entries, in leaf order.
    pub entries: Vec<LedgerEntry>,
}

impl LedgerBlock {
    /// Returns `true` if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.header.index == 0
    }
}

/// The ledger's head pointer: latest block hash and chain height.
///
/// Height counts sealed blocks, so the latest block's index is
/// `height - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainHead {
    /// Hash of the most recently sealed block.
    pub hash: Digest,
    /// Number of sealed blocks.
    pub height: u64,
}
