use serde::{Deserialize, Serialize};

use tally_crypto::{leaf_hash, verify_steps, MerkleStep};
use tally_types::Digest;

/// Proof that an entry was sealed into a specific block.
///
/// Carries the block coordinates plus the Merkle path from the entry's leaf
/// to the committed root. Verification is self-contained: a verifier who
/// trusts `merkle_root` (e.g. by checking `block_hash` against their own
/// copy of the chain) needs nothing but this proof and the entry id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    /// Chained hash of the owning block.
    pub block_hash: Digest,
    /// Index of the owning block.
    pub block_index: u64,
    /// The proven entry's id.
    pub entry_id: Digest,
    /// The entry's leaf position.
    pub leaf_index: u64,
    /// Merkle path from leaf to root.
    pub steps: Vec<MerkleStep>,
    /// The root committed by the block header.
    pub merkle_root: Digest,
}

impl InclusionProof {
    /// Recompute the root from the entry id and path; `true` iff it matches.
    pub fn verify(&self) -> bool {
        verify_steps(leaf_hash(&self.entry_id), &self.steps, self.merkle_root)
    }
}
