use sha2::{Digest as _, Sha256};
use tally_types::Digest;

/// Domain-separated SHA-256 hasher.
///
/// Each hasher carries an ASCII domain tag (e.g. `"ENTRY|"`, `"LEAF|"`)
/// that is prepended to every hash computation. This prevents cross-context
/// collisions: a leaf hash can never be replayed as a node hash, an entry id
/// can never masquerade as a block hash, and so on. Without this a forged
/// pre-image in one context would be a valid pre-image in another.
pub struct DomainHasher {
    domain: &'static str,
}

impl DomainHasher {
    /// Hasher for entry ids (over the canonical entry body).
    pub const ENTRY: Self = Self::new("ENTRY|");
    /// Hasher for Merkle leaves (over an entry id).
    pub const LEAF: Self = Self::new("LEAF|");
    /// Hasher for internal Merkle nodes (over `left ‖ right`).
    pub const NODE: Self = Self::new("NODE|");
    /// Hasher for block headers (over the canonical header).
    pub const BLOCK_HEADER: Self = Self::new("BLOCKHDR|");
    /// Hasher for chained block hashes (over `prev ‖ header_hash`).
    pub const BLOCK: Self = Self::new("BLOCK|");

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> Digest {
        self.hash_parts(&[data])
    }

    /// Hash a concatenation of byte segments with domain separation.
    ///
    /// Equivalent to `hash` over the concatenated segments, without the
    /// intermediate allocation.
    pub fn hash_parts(&self, parts: &[&[u8]]) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update(self.domain.as_bytes());
        for part in parts {
            hasher.update(part);
        }
        Digest::from_hash(hasher.finalize().into())
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}
