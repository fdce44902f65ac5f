use tally_types::Digest;

/// Errors from ledger store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The block being written does not chain to the current head.
    #[error("head mismatch: block chains to {actual}, head is {expected}")]
    HeadMismatch { expected: Digest, actual: Digest },

    /// A block with this index has already been written.
    #[error("duplicate block at index {0}")]
    DuplicateBlock(u64),

    /// Serialization or deserialization failure in a durable backend.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Opaque failure from a backend the ledger does not interpret.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
