use thiserror::Error;

use tally_crypto::{ChainError, EncodingError};
use tally_store::StoreError;
use tally_types::TypeError;

/// Errors produced by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An entry body failed validation on append.
    #[error("validation failed: {0}")]
    Validation(#[from] TypeError),

    /// Canonical encoding failed while deriving an id or sealing a header.
    #[error("encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    /// The store collaborator failed; propagated unchanged, never retried.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Chain verification found an integrity violation.
    #[error("chain integrity: {0}")]
    Chain(#[from] ChainError),

    /// A stored block contradicts its own index data.
    #[error("corrupt block {index}: {reason}")]
    CorruptBlock { index: u64, reason: String },
}
