use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use tally_types::{ChainHead, Digest, LedgerBlock, LedgerEntry};

use crate::error::{StoreError, StoreResult};
use crate::traits::{EntryRecord, LedgerStore};

/// In-memory, map-backed ledger store.
///
/// The reference implementation of [`LedgerStore`], intended for tests and
/// embedding. All state lives behind one `RwLock`, which gives readers the
/// head-pointer isolation the contract requires.
pub struct InMemoryStore {
    inner: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    blocks: BTreeMap<u64, LedgerBlock>,
    index_by_hash: HashMap<Digest, u64>,
    entries: HashMap<Digest, EntryRecord>,
    head: Option<ChainHead>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreState::default()),
        }
    }

    /// Number of sealed blocks.
    pub fn block_count(&self) -> usize {
        self.inner.read().expect("lock poisoned").blocks.len()
    }

    /// Number of indexed entries.
    pub fn entry_count(&self) -> usize {
        self.inner.read().expect("lock poisoned").entries.len()
    }

    /// Returns `true` if no block has been sealed.
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").blocks.is_empty()
    }

    /// Remove all state. Test helper; a durable ledger never deletes.
    pub fn clear(&self) {
        let mut state = self.inner.write().expect("lock poisoned");
        *state = StoreState::default();
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryStore {
    fn put_block(&self, block: &LedgerBlock) -> StoreResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");

        let expected = state.head.map_or_else(Digest::zero, |head| head.hash);
        if block.prev_block_hash != expected {
            return Err(StoreError::HeadMismatch {
                expected,
                actual: block.prev_block_hash,
            });
        }
        if state.blocks.contains_key(&block.header.index) {
            return Err(StoreError::DuplicateBlock(block.header.index));
        }

        state.index_by_hash.insert(block.block_hash, block.header.index);
        state.blocks.insert(block.header.index, block.clone());
        state.head = Some(ChainHead {
            hash: block.block_hash,
            height: block.header.index + 1,
        });
        Ok(())
    }

    fn block_by_index(&self, index: u64) -> StoreResult<Option<LedgerBlock>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.blocks.get(&index).cloned())
    }

    fn block_by_hash(&self, hash: &Digest) -> StoreResult<Option<LedgerBlock>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state
            .index_by_hash
            .get(hash)
            .and_then(|index| state.blocks.get(index))
            .cloned())
    }

    fn head(&self) -> StoreResult<Option<ChainHead>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.head)
    }

    fn put_entry(
        &self,
        entry: &LedgerEntry,
        block_index: u64,
        leaf_index: u64,
    ) -> StoreResult<()> {
        let mut state = self.inner.write().expect("lock poisoned");
        // Content addressing makes re-puts of the same id idempotent.
        state.entries.entry(entry.id).or_insert_with(|| EntryRecord {
            entry: entry.clone(),
            block_index,
            leaf_index,
        });
        Ok(())
    }

    fn entry(&self, id: &Digest) -> StoreResult<Option<EntryRecord>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.entries.get(id).cloned())
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("block_count", &self.block_count())
            .field("entry_count", &self.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_types::{BlockHeader, EntryBody, EntryKind, GameTime, BLOCK_VERSION};

    fn block(index: u64, prev: Digest, seed: u8) -> LedgerBlock {
        LedgerBlock {
            header: BlockHeader {
                version: BLOCK_VERSION,
                index,
                time_start: GameTime::new(index, 0),
                time_end: GameTime::new(index, 99),
                entry_count: 0,
                merkle_root: Digest::zero(),
            },
            prev_block_hash: prev,
            block_hash: Digest::from_hash([seed; 32]),
            entries: vec![],
        }
    }

    fn entry(seed: u8) -> LedgerEntry {
        LedgerEntry {
            id: Digest::from_hash([seed; 32]),
            body: EntryBody::new(EntryKind::Note, GameTime::zero(), "tester"),
        }
    }

    #[test]
    fn empty_store_has_no_head() {
        let store = InMemoryStore::new();
        assert!(store.head().unwrap().is_none());
        assert!(store.is_empty());
        assert!(store.block_by_index(0).unwrap().is_none());
    }

    #[test]
    fn put_block_advances_head() {
        let store = InMemoryStore::new();
        let genesis = block(0, Digest::zero(), 1);
        store.put_block(&genesis).unwrap();

        let head = store.head().unwrap().unwrap();
        assert_eq!(head.hash, genesis.block_hash);
        assert_eq!(head.height, 1);

        let next = block(1, genesis.block_hash, 2);
        store.put_block(&next).unwrap();
        assert_eq!(store.head().unwrap().unwrap().height, 2);
    }

    #[test]
    fn put_block_rejects_head_mismatch() {
        let store = InMemoryStore::new();
        let orphan = block(0, Digest::from_hash([9; 32]), 1);
        let err = store.put_block(&orphan).unwrap_err();
        assert!(matches!(err, StoreError::HeadMismatch { .. }));
        assert!(store.head().unwrap().is_none());
    }

    #[test]
    fn blocks_are_fetchable_by_index_and_hash() {
        let store = InMemoryStore::new();
        let genesis = block(0, Digest::zero(), 1);
        store.put_block(&genesis).unwrap();

        assert_eq!(store.block_by_index(0).unwrap().unwrap(), genesis);
        assert_eq!(
            store.block_by_hash(&genesis.block_hash).unwrap().unwrap(),
            genesis
        );
        assert!(store
            .block_by_hash(&Digest::from_hash([7; 32]))
            .unwrap()
            .is_none());
    }

    #[test]
    fn entries_roundtrip_with_locations() {
        let store = InMemoryStore::new();
        let e = entry(3);
        store.put_entry(&e, 2, 5).unwrap();

        let record = store.entry(&e.id).unwrap().unwrap();
        assert_eq!(record.entry, e);
        assert_eq!(record.block_index, 2);
        assert_eq!(record.leaf_index, 5);

        assert!(store.entry(&Digest::zero()).unwrap().is_none());
    }

    #[test]
    fn entry_reput_is_idempotent() {
        let store = InMemoryStore::new();
        let e = entry(4);
        store.put_entry(&e, 0, 0).unwrap();
        store.put_entry(&e, 9, 9).unwrap();

        // First location wins; a content-addressed entry has one home.
        let record = store.entry(&e.id).unwrap().unwrap();
        assert_eq!(record.block_index, 0);
        assert_eq!(store.entry_count(), 1);
    }

    #[test]
    fn clear_resets_everything() {
        let store = InMemoryStore::new();
        store.put_block(&block(0, Digest::zero(), 1)).unwrap();
        store.put_entry(&entry(1), 0, 0).unwrap();
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.entry_count(), 0);
        assert!(store.head().unwrap().is_none());
    }
}
