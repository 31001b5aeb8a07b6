use distributor_merkle_verify::hash_pair;

/// Layered Merkle tree over already-hashed leaves.
///
/// `layers[0]` holds the leaves in index order and the last layer holds the
/// root. Nodes are combined pairwise with the sorted-pair rule; when a layer has
/// an odd number of nodes the last one is carried up unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    layers: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    pub fn new(leaves: &[[u8; 32]]) -> Self {
        let mut layers = Vec::new();
        let mut current = leaves.to_vec();

        while current.len() > 1 {
            let next = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(left, right),
                    _ => pair[0],
                })
                .collect();
            layers.push(std::mem::replace(&mut current, next));
        }
        layers.push(current);

        Self { layers }
    }

    pub fn get_root(&self) -> Option<[u8; 32]> {
        self.layers.last().and_then(|layer| layer.first()).copied()
    }

    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Sibling hashes from the leaf at `index` up to the root. Levels where the
    /// node had no sibling contribute nothing, so proofs can be shorter than the
    /// tree depth.
    pub fn find_path(&self, index: usize) -> Option<Vec<[u8; 32]>> {
        if index >= self.leaf_count() {
            return None;
        }

        let mut proof = Vec::with_capacity(self.depth());
        let mut position = index;
        for layer in &self.layers[..self.depth()] {
            if let Some(sibling) = layer.get(position ^ 1) {
                proof.push(*sibling);
            }
            position /= 2;
        }
        Some(proof)
    }
}
