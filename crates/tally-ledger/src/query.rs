//! Filtered queries over committed history.
//!
//! Queries are lazy, forward-only walks over sealed blocks in index order.
//! Pending entries are never visible: a later seal may still reorder them,
//! so only committed history is queryable.

use std::collections::HashSet;

use tally_store::LedgerStore;
use tally_types::{Digest, EntryKind, GameTime, LedgerEntry};

use crate::error::LedgerError;

/// Conjunctive filter over ledger entries.
///
/// Every supplied predicate must hold for an entry to be yielded. An empty
/// filter matches everything.
#[derive(Clone, Debug, Default)]
pub struct EntryFilter {
    /// Inclusive lower time bound.
    pub time_from: Option<GameTime>,
    /// Inclusive upper time bound.
    pub time_to: Option<GameTime>,
    /// Exact entry kind.
    pub kind: Option<EntryKind>,
    /// Exact actor id.
    pub actor: Option<String>,
    /// Exact counterparty id.
    pub counterparty: Option<String>,
    /// Resource id present in the entry's inputs or outputs.
    pub resource: Option<String>,
    /// At least one of these ids among the entry's refs.
    pub refs_any: Option<HashSet<Digest>>,
    /// Stop after this many results.
    pub limit: Option<usize>,
}

impl EntryFilter {
    /// A filter that matches every committed entry.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to times at or after `from`.
    pub fn from_time(mut self, from: GameTime) -> Self {
        self.time_from = Some(from);
        self
    }

    /// Restrict to times at or before `to`.
    pub fn to_time(mut self, to: GameTime) -> Self {
        self.time_to = Some(to);
        self
    }

    /// Restrict to one entry kind.
    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restrict to one actor.
    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Restrict to one counterparty.
    pub fn counterparty(mut self, counterparty: impl Into<String>) -> Self {
        self.counterparty = Some(counterparty.into());
        self
    }

    /// Restrict to entries touching `resource` in inputs or outputs.
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Restrict to entries referencing at least one of `ids`.
    pub fn refs_any(mut self, ids: impl IntoIterator<Item = Digest>) -> Self {
        self.refs_any = Some(ids.into_iter().collect());
        self
    }

    /// Stop after `limit` results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns `true` if the given entry satisfies every supplied predicate.
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        if let Some(ref from) = self.time_from {
            if !entry.time().is_at_or_after(from) {
                return false;
            }
        }
        if let Some(ref to) = self.time_to {
            if !entry.time().is_at_or_before(to) {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if entry.kind() != kind {
                return false;
            }
        }
        if let Some(ref actor) = self.actor {
            if entry.actor() != actor {
                return false;
            }
        }
        if let Some(ref counterparty) = self.counterparty {
            if entry.body.counterparty.as_deref() != Some(counterparty.as_str()) {
                return false;
            }
        }
        if let Some(ref resource) = self.resource {
            if !entry.touches_resource(resource) {
                return false;
            }
        }
        if let Some(ref wanted) = self.refs_any {
            if !entry.body.refs.iter().any(|id| wanted.contains(id)) {
                return false;
            }
        }
        true
    }
}

/// Lazy iterator over committed entries matching a filter.
///
/// Blocks are fetched one at a time in index order; iteration ends at the
/// first missing index (the chain has no gaps). Store failures surface as
/// `Err` items and terminate the walk.
pub struct EntryIter<'a, S: LedgerStore> {
    store: &'a S,
    filter: EntryFilter,
    next_block: u64,
    current: std::vec::IntoIter<LedgerEntry>,
    yielded: usize,
    done: bool,
}

impl<'a, S: LedgerStore> EntryIter<'a, S> {
    pub(crate) fn new(store: &'a S, filter: EntryFilter) -> Self {
        Self {
            store,
            filter,
            next_block: 0,
            current: Vec::new().into_iter(),
            yielded: 0,
            done: false,
        }
    }
}

impl<S: LedgerStore> Iterator for EntryIter<'_, S> {
    type Item = Result<LedgerEntry, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(limit) = self.filter.limit {
            if self.yielded >= limit {
                self.done = true;
                return None;
            }
        }

        loop {
            for entry in self.current.by_ref() {
                if self.filter.matches(&entry) {
                    self.yielded += 1;
                    return Some(Ok(entry));
                }
            }

            match self.store.block_by_index(self.next_block) {
                Ok(Some(block)) => {
                    self.next_block += 1;
                    self.current = block.entries.into_iter();
                }
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(LedgerError::Store(e)));
                }
            }
        }
    }
}
