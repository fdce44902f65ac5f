use tracing::{debug, info, warn};

use tally_crypto::{chain, ChainVerifier, MerkleTree};
use tally_store::LedgerStore;
use tally_types::{
    BlockHeader, ChainHead, Digest, EntryBody, GameTime, LedgerBlock, LedgerEntry, BLOCK_VERSION,
};

use crate::error::LedgerError;
use crate::factory::derive_entry;
use crate::proof::InclusionProof;
use crate::query::{EntryFilter, EntryIter};

/// Default block window, in global ticks.
pub const TICKS_PER_BLOCK: u64 = 100;

/// The order in which pending entries become Merkle leaves at seal time.
///
/// Fixed for the life of a ledger: leaf positions determine every proof ever
/// issued for a block, so the order must never change retroactively.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SealOrder {
    /// Leaves in append order.
    #[default]
    Append,
    /// Leaves sorted by entry id.
    ByEntryId,
}

/// Engine configuration.
#[derive(Clone, Debug)]
pub struct LedgerConfig {
    /// Global-tick span of one block window.
    pub ticks_per_block: u64,
    /// Leaf ordering at seal time.
    pub seal_order: SealOrder,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            ticks_per_block: TICKS_PER_BLOCK,
            seal_order: SealOrder::default(),
        }
    }
}

/// Per-append options.
#[derive(Clone, Copy, Debug, Default)]
pub struct AppendOptions {
    /// Validate resource deltas before deriving the entry.
    pub validate: bool,
}

impl AppendOptions {
    /// Options with validation enabled.
    pub const fn validated() -> Self {
        Self { validate: true }
    }
}

/// The ledger engine: one logical writer over one chain.
///
/// Owns the pending buffer and window marker; sealed state lives in the
/// injected store. Write operations take `&mut self`, so the
/// append-then-maybe-seal sequence is a single critical section by
/// construction — to share a ledger across threads, wrap the whole engine
/// in a `Mutex`. Readers only touch committed blocks and can equally be
/// served by a separate handle on the same store.
pub struct Ledger<S: LedgerStore> {
    store: S,
    config: LedgerConfig,
    pending: Vec<LedgerEntry>,
    window_start: Option<GameTime>,
}

impl<S: LedgerStore> Ledger<S> {
    /// Create an engine over `store` with default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    /// Create an engine with explicit configuration.
    pub fn with_config(store: S, config: LedgerConfig) -> Self {
        Self {
            store,
            config,
            pending: Vec::new(),
            window_start: None,
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// The injected store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of entries waiting to be sealed.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Derive an entry from `body` and buffer it for the next block.
    ///
    /// If the incoming entry's `global_tick` is a full window past the
    /// buffered window's start, the buffered entries are sealed first (with
    /// the incoming entry's time as the end boundary) and the new entry
    /// starts the next window.
    pub fn append_entry(
        &mut self,
        body: EntryBody,
        options: AppendOptions,
    ) -> Result<LedgerEntry, LedgerError> {
        if options.validate {
            body.validate()?;
        }

        if self.window_is_full(&body.time) {
            self.seal_block(body.time.clone())?;
        }

        let entry = derive_entry(body)?;
        if self.pending.is_empty() {
            self.window_start = Some(entry.body.time.clone());
        }
        debug!(id = %entry.id.short_hex(), pending = self.pending.len() + 1, "entry appended");
        self.pending.push(entry.clone());
        Ok(entry)
    }

    fn window_is_full(&self, incoming: &GameTime) -> bool {
        let start = self
            .window_start
            .as_ref()
            .and_then(|time| time.global_tick);
        match (start, incoming.global_tick) {
            (Some(start), Some(tick)) => {
                tick.saturating_sub(start) >= self.config.ticks_per_block
            }
            // Without global ticks on both ends there is no window measure;
            // sealing is manual.
            _ => false,
        }
    }

    /// Seal the pending buffer into a block ending at `time_end`.
    ///
    /// Returns `Ok(None)` without touching the head if nothing is pending.
    /// On store failure the buffer is left intact. If the failure hit before
    /// the block write, retrying the seal is safe; if it hit afterwards (an
    /// entry-record write failed) the block is already committed and the
    /// caller must reconcile against the head before sealing again.
    pub fn seal_block(&mut self, time_end: GameTime) -> Result<Option<LedgerBlock>, LedgerError> {
        if self.pending.is_empty() {
            return Ok(None);
        }

        let mut entries = self.pending.clone();
        if self.config.seal_order == SealOrder::ByEntryId {
            entries.sort_by(|a, b| a.id.cmp(&b.id));
        }

        let ids: Vec<Digest> = entries.iter().map(|entry| entry.id).collect();
        let tree = MerkleTree::build(&ids);

        let (prev_block_hash, index) = match self.store.head()? {
            Some(head) => (head.hash, head.height),
            None => (Digest::zero(), 0),
        };
        let time_start = self
            .window_start
            .clone()
            .unwrap_or_else(|| entries[0].body.time.clone());

        let header = BlockHeader {
            version: BLOCK_VERSION,
            index,
            time_start,
            time_end,
            entry_count: entries.len() as u64,
            merkle_root: tree.root(),
        };
        let header_hash = chain::header_hash(&header)?;
        let block_hash = chain::block_hash(&prev_block_hash, &header_hash);

        let block = LedgerBlock {
            header,
            prev_block_hash,
            block_hash,
            entries,
        };

        self.store.put_block(&block)?;
        for (leaf_index, entry) in block.entries.iter().enumerate() {
            self.store.put_entry(entry, index, leaf_index as u64)?;
        }

        self.pending.clear();
        self.window_start = None;
        info!(
            index,
            entries = block.header.entry_count,
            root = %block.header.merkle_root.short_hex(),
            hash = %block.block_hash.short_hex(),
            "block sealed"
        );
        Ok(Some(block))
    }

    /// Build an inclusion proof for a committed entry.
    ///
    /// Returns `Ok(None)` if the entry was never sealed, or if its recorded
    /// block is missing from the store (logged as an inconsistency).
    pub fn proof(&self, entry_id: &Digest) -> Result<Option<InclusionProof>, LedgerError> {
        let Some(record) = self.store.entry(entry_id)? else {
            return Ok(None);
        };
        let Some(block) = self.store.block_by_index(record.block_index)? else {
            warn!(
                block_index = record.block_index,
                entry = %entry_id.short_hex(),
                "entry location points at a missing block"
            );
            return Ok(None);
        };

        let ids: Vec<Digest> = block.entries.iter().map(|entry| entry.id).collect();
        let tree = MerkleTree::build(&ids);
        let steps = tree
            .proof_steps(record.leaf_index as usize)
            .ok_or_else(|| LedgerError::CorruptBlock {
                index: record.block_index,
                reason: format!(
                    "leaf index {} out of range for {} entries",
                    record.leaf_index,
                    block.entries.len()
                ),
            })?;

        Ok(Some(InclusionProof {
            block_hash: block.block_hash,
            block_index: record.block_index,
            entry_id: *entry_id,
            leaf_index: record.leaf_index,
            steps,
            merkle_root: block.header.merkle_root,
        }))
    }

    /// Verify an inclusion proof against its claimed root.
    pub fn verify_proof(&self, proof: &InclusionProof) -> bool {
        proof.verify()
    }

    /// Lazily iterate committed entries matching `filter`, in block order.
    pub fn query(&self, filter: EntryFilter) -> EntryIter<'_, S> {
        EntryIter::new(&self.store, filter)
    }

    /// The current head, if any block has been sealed.
    pub fn head(&self) -> Result<Option<ChainHead>, LedgerError> {
        Ok(self.store.head()?)
    }

    /// The latest block hash, or the zero digest for an empty chain.
    pub fn head_block_hash(&self) -> Result<Digest, LedgerError> {
        Ok(self
            .store
            .head()?
            .map_or_else(Digest::zero, |head| head.hash))
    }

    /// Fetch a sealed block by index.
    pub fn block_by_index(&self, index: u64) -> Result<Option<LedgerBlock>, LedgerError> {
        Ok(self.store.block_by_index(index)?)
    }

    /// Fetch a sealed block by hash.
    pub fn block_by_hash(&self, hash: &Digest) -> Result<Option<LedgerBlock>, LedgerError> {
        Ok(self.store.block_by_hash(hash)?)
    }

    /// Walk the whole chain and verify every link and hash.
    pub fn verify_chain(&self) -> Result<(), LedgerError> {
        let height = self.store.head()?.map_or(0, |head| head.height);
        let mut blocks = Vec::with_capacity(height as usize);
        for index in 0..height {
            let block = self
                .store
                .block_by_index(index)?
                .ok_or_else(|| LedgerError::CorruptBlock {
                    index,
                    reason: "missing below head".into(),
                })?;
            blocks.push(block);
        }
        ChainVerifier::verify(&blocks)?;
        Ok(())
    }
}
