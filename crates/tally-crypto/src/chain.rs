use thiserror::Error;

use tally_types::{BlockHeader, Digest, LedgerBlock};

use crate::canonical;
use crate::error::EncodingError;
use crate::hasher::DomainHasher;

/// Hash a block header: BLOCKHDR domain over the canonical header encoding.
pub fn header_hash(header: &BlockHeader) -> Result<Digest, EncodingError> {
    Ok(DomainHasher::BLOCK_HEADER.hash(&canonical::encode(header)?))
}

/// Chain a block hash: BLOCK domain over `prev ‖ header_hash`.
pub fn block_hash(prev: &Digest, header_hash: &Digest) -> Digest {
    DomainHasher::BLOCK.hash_parts(&[prev.as_bytes(), header_hash.as_bytes()])
}

/// Errors from chain verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("genesis block does not chain to the zero digest")]
    GenesisPrevNotZero,

    #[error("broken link at block {index}: prev_block_hash does not match")]
    BrokenLink { index: u64 },

    #[error("block {index} is out of sequence: expected index {expected}")]
    IndexGap { index: u64, expected: u64 },

    #[error("hash mismatch at block {index}: stored block_hash does not recompute")]
    HashMismatch { index: u64 },

    #[error("encoding failure at block {index}: {source}")]
    Encoding {
        index: u64,
        #[source]
        source: EncodingError,
    },
}

/// Block hash-chain integrity verifier.
///
/// Checks that a sequence of blocks in index order forms a valid chain:
/// the genesis block chains to the zero digest, every later block's
/// `prev_block_hash` matches its predecessor's `block_hash`, indices are
/// gapless, and every stored `block_hash` recomputes from its header.
pub struct ChainVerifier;

impl ChainVerifier {
    /// Verify a chain of sealed blocks. An empty chain is valid.
    pub fn verify(blocks: &[LedgerBlock]) -> Result<(), ChainError> {
        let mut prev: Option<&LedgerBlock> = None;

        for block in blocks {
            let index = block.header.index;

            match prev {
                None => {
                    if !block.prev_block_hash.is_zero() {
                        return Err(ChainError::GenesisPrevNotZero);
                    }
                }
                Some(parent) => {
                    let expected = parent.header.index + 1;
                    if index != expected {
                        return Err(ChainError::IndexGap { index, expected });
                    }
                    if block.prev_block_hash != parent.block_hash {
                        return Err(ChainError::BrokenLink { index });
                    }
                }
            }

            let header = header_hash(&block.header)
                .map_err(|source| ChainError::Encoding { index, source })?;
            if block_hash(&block.prev_block_hash, &header) != block.block_hash {
                return Err(ChainError::HashMismatch { index });
            }

            prev = Some(block);
        }

        Ok(())
    }
}
