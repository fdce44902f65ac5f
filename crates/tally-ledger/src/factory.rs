//! Entry derivation: the factory that turns bodies into entries.
//!
//! An entry's id is the ENTRY-domain hash of its body's canonical encoding.
//! Derivation is pure and deterministic: identical bodies always derive the
//! same id. That collision is content-addressed idempotence, not a bug —
//! recording the "same" event twice at the same logical time yields one
//! identity on purpose.

use tally_crypto::{canonical, DomainHasher};
use tally_types::{EntryBody, LedgerEntry};

use crate::error::LedgerError;

/// Derive a ledger entry from its body.
pub fn derive_entry(body: EntryBody) -> Result<LedgerEntry, LedgerError> {
    let encoded = canonical::encode(&body)?;
    let id = DomainHasher::ENTRY.hash(&encoded);
    Ok(LedgerEntry { id, body })
}

/// Recompute an entry's id from its body and compare with the stored id.
///
/// Returns `Ok(false)` if the entry's id does not match its content.
pub fn verify_entry_id(entry: &LedgerEntry) -> Result<bool, LedgerError> {
    let encoded = canonical::encode(&entry.body)?;
    Ok(DomainHasher::ENTRY.hash(&encoded) == entry.id)
}
