use serde::{Deserialize, Serialize};
use tally_types::Digest;

use crate::hasher::DomainHasher;

/// Side on which a proof step's sibling sits relative to the running hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// One step of an inclusion proof, from a leaf toward the root.
///
/// An unpaired node at the end of an odd layer is promoted to the next layer
/// unchanged; its proof step is [`MerkleStep::Promoted`] and contributes
/// nothing when the root is recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MerkleStep {
    /// Combine the running hash with `sibling`, which sits on `side`.
    Pair { side: Side, sibling: Digest },
    /// The running hash passed through this layer unchanged.
    Promoted,
}

/// Hash a leaf source (an entry id) into its leaf position.
///
/// Leaves are never raw content; tree construction always starts from
/// already-derived entry ids, re-tagged into the LEAF domain.
pub fn leaf_hash(source: &Digest) -> Digest {
    DomainHasher::LEAF.hash(source.as_bytes())
}

/// Hash two adjacent nodes into their parent.
pub fn node_hash(left: &Digest, right: &Digest) -> Digest {
    DomainHasher::NODE.hash_parts(&[left.as_bytes(), right.as_bytes()])
}

/// Binary Merkle tree over leaf-hashed entry ids.
///
/// Layers are built left-to-right: adjacent nodes pair into a NODE-domain
/// hash; an odd trailing node is promoted unchanged (not duplicated, not
/// re-hashed). An empty tree roots at [`Digest::zero`].
#[derive(Clone, Debug)]
pub struct MerkleTree {
    /// All layers, leaves first. The last layer is the single root node.
    /// Empty for an empty tree.
    layers: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Build a tree from ordered leaf sources (entry ids).
    pub fn build(sources: &[Digest]) -> Self {
        if sources.is_empty() {
            return Self { layers: vec![] };
        }

        let leaves: Vec<Digest> = sources.iter().map(leaf_hash).collect();
        let mut layers = vec![leaves];

        while layers[layers.len() - 1].len() > 1 {
            let current = &layers[layers.len() - 1];
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for pair in current.chunks(2) {
                match pair {
                    [left, right] => next.push(node_hash(left, right)),
                    // Odd trailing node: promoted unchanged.
                    [single] => next.push(*single),
                    _ => unreachable!("chunks(2) yields 1 or 2 elements"),
                }
            }
            layers.push(next);
        }

        Self { layers }
    }

    /// The root hash; [`Digest::zero`] for an empty tree.
    pub fn root(&self) -> Digest {
        self.layers
            .last()
            .and_then(|layer| layer.first())
            .copied()
            .unwrap_or_else(Digest::zero)
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.layers.first().map_or(0, Vec::len)
    }

    /// The leaf hash at `index`, if in range.
    pub fn leaf_hash_at(&self, index: usize) -> Option<Digest> {
        self.layers.first().and_then(|leaves| leaves.get(index)).copied()
    }

    /// Generate the inclusion proof steps for the leaf at `index`.
    ///
    /// Each step names the sibling to combine with the running hash — the
    /// opposite side of the current node — or records a promotion where the
    /// node had no sibling.
    pub fn proof_steps(&self, index: usize) -> Option<Vec<MerkleStep>> {
        if index >= self.leaf_count() {
            return None;
        }

        let mut steps = Vec::with_capacity(self.layers.len().saturating_sub(1));
        let mut idx = index;

        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling_idx = if idx % 2 == 0 { idx + 1 } else { idx - 1 };
            let step = match layer.get(sibling_idx) {
                Some(sibling) => MerkleStep::Pair {
                    // The proof encodes where the sibling sits: left of the
                    // running hash when the current node is on the right.
                    side: if idx % 2 == 0 { Side::Right } else { Side::Left },
                    sibling: *sibling,
                },
                None => MerkleStep::Promoted,
            };
            steps.push(step);
            idx /= 2;
        }

        Some(steps)
    }
}

/// Recompute a root from a leaf hash and proof steps, and compare.
///
/// The accumulator starts at `leaf`; each `Pair` step folds the sibling in
/// on its recorded side, and each `Promoted` step passes the accumulator
/// through unchanged.
pub fn verify_steps(leaf: Digest, steps: &[MerkleStep], expected_root: Digest) -> bool {
    let mut acc = leaf;
    for step in steps {
        acc = match step {
            MerkleStep::Pair {
                side: Side::Left,
                sibling,
            } => node_hash(sibling, &acc),
            MerkleStep::Pair {
                side: Side::Right,
                sibling,
            } => node_hash(&acc, sibling),
            MerkleStep::Promoted => acc,
        };
    }
    acc == expected_root
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn source(seed: u8) -> Digest {
        Digest::from_hash([seed; 32])
    }

    fn sources(n: u8) -> Vec<Digest> {
        (1..=n).map(source).collect()
    }

    #[test]
    fn empty_tree_has_zero_root() {
        let tree = MerkleTree::build(&[]);
        assert!(tree.root().is_zero());
        assert_eq!(tree.leaf_count(), 0);
        assert!(tree.proof_steps(0).is_none());
    }

    #[test]
    fn single_leaf_root_is_the_leaf_hash() {
        let tree = MerkleTree::build(&sources(1));
        assert_eq!(tree.root(), leaf_hash(&source(1)));
        assert_eq!(tree.proof_steps(0).unwrap(), vec![]);
    }

    #[test]
    fn two_leaves_produce_a_node_parent() {
        let tree = MerkleTree::build(&sources(2));
        let expected = node_hash(&leaf_hash(&source(1)), &leaf_hash(&source(2)));
        assert_eq!(tree.root(), expected);
    }

    #[test]
    fn odd_leaf_is_promoted_not_duplicated() {
        let tree = MerkleTree::build(&sources(3));
        let left = node_hash(&leaf_hash(&source(1)), &leaf_hash(&source(2)));
        // The third leaf reaches the top layer untouched.
        let expected = node_hash(&left, &leaf_hash(&source(3)));
        assert_eq!(tree.root(), expected);
    }

    #[test]
    fn promoted_leaf_proof_has_no_sibling_at_first_level() {
        let tree = MerkleTree::build(&sources(3));
        let steps = tree.proof_steps(2).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], MerkleStep::Promoted);
        assert!(matches!(
            steps[1],
            MerkleStep::Pair {
                side: Side::Left,
                ..
            }
        ));
    }

    #[test]
    fn proofs_verify_for_all_leaves() {
        for n in 1..=9u8 {
            let ids = sources(n);
            let tree = MerkleTree::build(&ids);
            for (i, id) in ids.iter().enumerate() {
                let steps = tree.proof_steps(i).unwrap();
                assert!(
                    verify_steps(leaf_hash(id), &steps, tree.root()),
                    "proof for leaf {i} of {n} should verify"
                );
            }
        }
    }

    #[test]
    fn proof_out_of_bounds_returns_none() {
        let tree = MerkleTree::build(&sources(2));
        assert!(tree.proof_steps(5).is_none());
    }

    #[test]
    fn tampered_leaf_fails_verification() {
        let ids = sources(4);
        let tree = MerkleTree::build(&ids);
        let steps = tree.proof_steps(0).unwrap();
        assert!(!verify_steps(leaf_hash(&source(99)), &steps, tree.root()));
    }

    #[test]
    fn tampered_sibling_fails_verification() {
        let ids = sources(4);
        let tree = MerkleTree::build(&ids);
        let mut steps = tree.proof_steps(1).unwrap();
        if let MerkleStep::Pair { sibling, .. } = &mut steps[0] {
            let mut bytes = *sibling.as_bytes();
            bytes[0] ^= 0x01;
            *sibling = Digest::from_hash(bytes);
        }
        assert!(!verify_steps(leaf_hash(&ids[1]), &steps, tree.root()));
    }

    #[test]
    fn tampered_root_fails_verification() {
        let ids = sources(4);
        let tree = MerkleTree::build(&ids);
        let steps = tree.proof_steps(2).unwrap();
        let mut bytes = *tree.root().as_bytes();
        bytes[31] ^= 0x80;
        assert!(!verify_steps(
            leaf_hash(&ids[2]),
            &steps,
            Digest::from_hash(bytes)
        ));
    }

    #[test]
    fn power_of_two_proofs_have_log_depth() {
        let ids = sources(8);
        let tree = MerkleTree::build(&ids);
        for i in 0..8 {
            assert_eq!(tree.proof_steps(i).unwrap().len(), 3);
        }
    }

    #[test]
    fn leaves_are_domain_separated_from_sources() {
        // A tree over one source must not root at the raw source digest.
        let tree = MerkleTree::build(&sources(1));
        assert_ne!(tree.root(), source(1));
    }

    #[test]
    fn step_serde_roundtrip() {
        let tree = MerkleTree::build(&sources(5));
        let steps = tree.proof_steps(4).unwrap();
        let json = serde_json::to_string(&steps).unwrap();
        let parsed: Vec<MerkleStep> = serde_json::from_str(&json).unwrap();
        assert_eq!(steps, parsed);
    }

    proptest! {
        #[test]
        fn proof_soundness(seeds in proptest::collection::vec(any::<[u8; 32]>(), 1..40)) {
            let ids: Vec<Digest> = seeds.into_iter().map(Digest::from_hash).collect();
            let tree = MerkleTree::build(&ids);
            for (i, id) in ids.iter().enumerate() {
                let steps = tree.proof_steps(i).unwrap();
                prop_assert!(verify_steps(leaf_hash(id), &steps, tree.root()));
            }
        }

        #[test]
        fn single_bit_leaf_flip_is_rejected(
            seeds in proptest::collection::vec(any::<[u8; 32]>(), 2..20),
            index: proptest::sample::Index,
            bit in 0usize..256,
        ) {
            let ids: Vec<Digest> = seeds.into_iter().map(Digest::from_hash).collect();
            let tree = MerkleTree::build(&ids);
            let i = index.index(ids.len());
            let steps = tree.proof_steps(i).unwrap();

            let mut flipped = *leaf_hash(&ids[i]).as_bytes();
            flipped[bit / 8] ^= 1 << (bit % 8);
            prop_assert!(!verify_steps(Digest::from_hash(flipped), &steps, tree.root()));
        }
    }
}
