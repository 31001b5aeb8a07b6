use std::{
    collections::{HashMap, HashSet},
    fs::{self, File},
    io::BufReader,
    path::Path,
    result,
    str::FromStr,
};

use distributor_merkle_verify::verify_claim;
use indexmap::IndexMap;
use solana_program::pubkey::Pubkey;
use tracing::info;

use crate::{
    allocation::{BalanceMap, RawAllocation},
    artifact::{decode_amount, decode_hash, encode_amount, encode_hash, ClaimInfo, DistributionArtifact},
    csv_entry::CsvEntry,
    error::{MerkleTreeError, MerkleTreeError::MerkleValidationError},
    merkle_tree::MerkleTree,
    tree_node::TreeNode,
    utils::{get_proof, get_token_total},
};

/// Merkle Tree which will be used to distribute tokens to claimants.
/// Contains all the information necessary to verify claims against the Merkle Tree.
///
/// Leaves are indexed in ascending order of the claimant's 32 pubkey bytes, so
/// the same allocation set always produces the same root and proofs no matter
/// how the input was ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirdropMerkleTree {
    /// The merkle root, which is uploaded on-chain
    pub merkle_root: [u8; 32],
    pub max_num_nodes: u64,
    /// Exact sum of every node's amount
    pub token_total: u64,
    pub tree_nodes: Vec<TreeNode>,
}

pub type Result<T> = result::Result<T, MerkleTreeError>;

impl AirdropMerkleTree {
    /// Validates a raw allocation set and builds the tree. Fails as a whole on the
    /// first invalid or duplicate entry; nothing is produced in that case.
    pub fn new(allocations: Vec<RawAllocation>) -> Result<Self> {
        if allocations.is_empty() {
            return Err(MerkleTreeError::EmptyInput);
        }

        let mut seen = HashSet::with_capacity(allocations.len());
        let mut parsed = Vec::with_capacity(allocations.len());
        for allocation in allocations.iter() {
            let (claimant, amount) = allocation.parse()?;
            if !seen.insert(claimant) {
                return Err(MerkleTreeError::DuplicateAccount(claimant.to_string()));
            }
            parsed.push((claimant, amount));
        }

        parsed.sort_unstable_by_key(|(claimant, _)| *claimant);

        let tree_nodes = parsed
            .into_iter()
            .enumerate()
            .map(|(index, (claimant, amount))| TreeNode {
                index: index as u64,
                claimant,
                amount,
                proof: None,
            })
            .collect();

        Self::from_tree_nodes(tree_nodes)
    }

    /// Builds the tree over nodes whose indices are already assigned (0..n, in order).
    pub fn from_tree_nodes(mut tree_nodes: Vec<TreeNode>) -> Result<Self> {
        if tree_nodes.is_empty() {
            return Err(MerkleTreeError::EmptyInput);
        }

        let hashed_nodes = tree_nodes.iter().map(TreeNode::hash).collect::<Vec<_>>();
        let tree = MerkleTree::new(&hashed_nodes[..]);

        for (i, tree_node) in tree_nodes.iter_mut().enumerate() {
            tree_node.proof = Some(get_proof(&tree, i));
        }

        let total = get_token_total(&tree_nodes);
        let token_total = u64::try_from(total).map_err(|_| {
            MerkleTreeError::InvalidAllocation(format!(
                "token total {total} exceeds the u64 range of token amounts"
            ))
        })?;

        let tree = AirdropMerkleTree {
            merkle_root: tree.get_root().ok_or(MerkleTreeError::MerkleRootError)?,
            max_num_nodes: tree_nodes.len() as u64,
            token_total,
            tree_nodes,
        };

        info!(
            "created merkle tree with {} nodes and token total of {}",
            tree.max_num_nodes, tree.token_total
        );
        tree.validate()?;
        Ok(tree)
    }

    /// Load a merkle tree from a csv path
    pub fn new_from_csv(path: &Path) -> Result<Self> {
        let csv_entries = CsvEntry::new_from_file(path)?;
        Self::new(csv_entries.into_iter().map(RawAllocation::from).collect())
    }

    /// Load a merkle tree from a JSON balance map `{ "<pubkey>": amount }`
    pub fn new_from_balance_map(path: &Path) -> Result<Self> {
        Self::new(BalanceMap::new_from_file(path)?.into_allocations())
    }

    /// Load a persisted claim artifact from file path, re-checking every proof
    pub fn new_from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let artifact: DistributionArtifact = serde_json::from_reader(reader)?;

        Self::try_from(artifact)
    }

    /// Write the claim artifact to a filepath
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self.to_artifact())?;
        fs::write(path, serialized)?;
        Ok(())
    }

    pub fn to_artifact(&self) -> DistributionArtifact {
        let claims = self
            .tree_nodes
            .iter()
            .map(|node| {
                let claim = ClaimInfo {
                    index: node.index,
                    amount: encode_amount(node.amount),
                    proof: node
                        .proof
                        .iter()
                        .flatten()
                        .map(encode_hash)
                        .collect(),
                };
                (node.claimant.to_string(), claim)
            })
            .collect::<IndexMap<_, _>>();

        DistributionArtifact {
            root: encode_hash(&self.merkle_root),
            token_total: encode_amount(self.token_total),
            claims,
        }
    }

    pub fn get_node(&self, claimant: &Pubkey) -> Option<&TreeNode> {
        self.tree_nodes.iter().find(|n| n.claimant == *claimant)
    }

    fn validate(&self) -> Result<()> {
        if self.tree_nodes.is_empty() {
            return Err(MerkleTreeError::EmptyInput);
        }

        // validate that the length is equal to the max_num_nodes
        if self.tree_nodes.len() as u64 != self.max_num_nodes {
            return Err(MerkleValidationError(format!(
                "Tree nodes length {} does not match max_num_nodes {}",
                self.tree_nodes.len(),
                self.max_num_nodes
            )));
        }

        // validate that indices are exactly 0..n in order
        if let Some((position, node)) = self
            .tree_nodes
            .iter()
            .enumerate()
            .find(|(position, node)| node.index != *position as u64)
        {
            return Err(MerkleValidationError(format!(
                "Tree node at position {} has index {}",
                position, node.index
            )));
        }

        // validate that there are no duplicate claimants
        let unique_nodes: HashSet<_> = self.tree_nodes.iter().map(|n| n.claimant).collect();

        if unique_nodes.len() != self.tree_nodes.len() {
            return Err(MerkleValidationError(
                "Duplicate claimants found".to_string(),
            ));
        }

        // validate that sum is equal to token_total
        let sum = get_token_total(&self.tree_nodes);

        if sum != u128::from(self.token_total) {
            return Err(MerkleValidationError(format!(
                "Tree nodes sum {} does not match token_total {}",
                sum, self.token_total
            )));
        }

        self.verify_proof()
    }

    /// verify that the leaves of the merkle tree match the nodes and that every
    /// stored proof is accepted by the same check the program runs
    pub fn verify_proof(&self) -> Result<()> {
        let root = self.merkle_root;

        // Recreate root given nodes
        let hashed_nodes: Vec<[u8; 32]> = self.tree_nodes.iter().map(TreeNode::hash).collect();
        let mk = MerkleTree::new(&hashed_nodes[..]);

        if mk.get_root() != Some(root) {
            return Err(MerkleValidationError(
                "Merkle root is invalid given nodes".to_string(),
            ));
        }

        for node in self.tree_nodes.iter() {
            let proof = node.proof.as_ref().ok_or_else(|| {
                MerkleValidationError(format!("missing proof for {}", node.claimant))
            })?;

            if !verify_claim(root, node.index, &node.claimant, node.amount, proof) {
                return Err(MerkleValidationError(format!(
                    "invalid merkle proof for {}",
                    node.claimant
                )));
            }
        }

        Ok(())
    }

    // Converts Merkle Tree to a map for faster key access
    pub fn convert_to_hashmap(&self) -> HashMap<Pubkey, TreeNode> {
        self.tree_nodes
            .iter()
            .map(|n| (n.claimant, n.clone()))
            .collect()
    }
}

impl TryFrom<DistributionArtifact> for AirdropMerkleTree {
    type Error = MerkleTreeError;

    fn try_from(artifact: DistributionArtifact) -> Result<Self> {
        let mut tree_nodes = artifact
            .claims
            .iter()
            .map(|(account, claim)| {
                let claimant = Pubkey::from_str(account).map_err(|e| {
                    MerkleValidationError(format!("invalid claimant {account:?}: {e}"))
                })?;
                let proof = claim
                    .proof
                    .iter()
                    .map(|hash| decode_hash(hash))
                    .collect::<Result<Vec<_>>>()?;
                Ok(TreeNode {
                    index: claim.index,
                    claimant,
                    amount: decode_amount(&claim.amount)?,
                    proof: Some(proof),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        tree_nodes.sort_by_key(|node| node.index);

        let tree = AirdropMerkleTree {
            merkle_root: decode_hash(&artifact.root)?,
            max_num_nodes: tree_nodes.len() as u64,
            token_total: decode_amount(&artifact.token_total)?,
            tree_nodes,
        };
        tree.validate()?;
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use distributor_merkle_verify::hash_pair;
    use rand::{seq::SliceRandom, Rng};

    use super::*;

    const ALICE: &str = "4vJ9JU1bJJE96FWSJKvHsmmFADCg4gpZQff4P3bkLKi";
    const BOB: &str = "8qbHbw2BbbTHBW1sbeqakYXVKRQM8Ne7pLK7m6CVfeR";
    const CATHERINE: &str = "CktRuQ2mttgRGkXJtyksdKHjUdc2C4TgDzyB98oEzy8";

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("distributor-{}-{name}", std::process::id()))
    }

    fn three_allocations() -> Vec<RawAllocation> {
        vec![
            RawAllocation::new(CATHERINE, 250),
            RawAllocation::new(ALICE, 200),
            RawAllocation::new(BOB, 300),
        ]
    }

    fn random_allocations(n: usize) -> Vec<RawAllocation> {
        let mut rng = rand::thread_rng();
        (0..n)
            .map(|_| {
                RawAllocation::new(
                    Pubkey::new_unique().to_string(),
                    rng.gen_range(1..=1_000_000_000u64),
                )
            })
            .collect()
    }

    #[test]
    fn test_three_account_scenario() {
        let tree = AirdropMerkleTree::new(three_allocations()).unwrap();

        assert_eq!(tree.token_total, 750);
        assert_eq!(tree.max_num_nodes, 3);
        assert_eq!(
            encode_hash(&tree.merkle_root),
            "0x3482374eaa28ee809fd6d7469a514a39cacad0f42c5aac92600c7cd2bb411922"
        );

        let proof_lengths: Vec<_> = tree
            .tree_nodes
            .iter()
            .map(|n| n.proof.as_ref().unwrap().len())
            .collect();
        // the third leaf is promoted past the first layer
        assert_eq!(proof_lengths, vec![2, 2, 1]);

        let claimants: Vec<_> = tree.tree_nodes.iter().map(|n| n.claimant.to_string()).collect();
        assert_eq!(claimants, vec![ALICE, BOB, CATHERINE]);
        assert_eq!(
            tree.tree_nodes[2].proof.as_ref().unwrap()[0],
            hash_pair(&tree.tree_nodes[0].hash(), &tree.tree_nodes[1].hash())
        );
    }

    #[test]
    fn test_every_leaf_verifies_and_mutations_fail() {
        let tree = AirdropMerkleTree::new(random_allocations(37)).unwrap();
        let root = tree.merkle_root;
        let other = Pubkey::new_unique();

        for node in tree.tree_nodes.iter() {
            let proof = node.proof.as_ref().unwrap();
            assert!(verify_claim(root, node.index, &node.claimant, node.amount, proof));
            assert!(!verify_claim(root, node.index + 1, &node.claimant, node.amount, proof));
            assert!(!verify_claim(root, node.index, &other, node.amount, proof));
            assert!(!verify_claim(root, node.index, &node.claimant, node.amount + 1, proof));
        }
    }

    #[test]
    fn test_token_total_matches_sum() {
        for n in [1usize, 2, 3, 64, 255] {
            let allocations = random_allocations(n);
            let expected: u64 = allocations.iter().map(|a| a.amount.parse().unwrap()).sum();
            let tree = AirdropMerkleTree::new(allocations).unwrap();
            assert_eq!(tree.token_total, expected);
            assert_eq!(tree.max_num_nodes, n as u64);
        }
    }

    #[test]
    fn test_single_allocation() {
        let tree = AirdropMerkleTree::new(vec![RawAllocation::new(ALICE, 1)]).unwrap();
        let node = &tree.tree_nodes[0];
        assert_eq!(tree.token_total, 1);
        assert_eq!(node.proof, Some(vec![]));
        assert_eq!(tree.merkle_root, node.hash());
    }

    #[test]
    fn test_build_is_independent_of_input_order() {
        let mut allocations = random_allocations(50);
        let first = AirdropMerkleTree::new(allocations.clone()).unwrap();
        allocations.shuffle(&mut rand::thread_rng());
        let second = AirdropMerkleTree::new(allocations).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.to_artifact()).unwrap(),
            serde_json::to_string(&second.to_artifact()).unwrap()
        );
    }

    #[test]
    fn test_duplicate_claimants_rejected() {
        let mut allocations = three_allocations();
        allocations.push(RawAllocation::new(format!(" {BOB}"), 1));
        let err = AirdropMerkleTree::new(allocations).unwrap_err();
        assert!(matches!(err, MerkleTreeError::DuplicateAccount(account) if account == BOB));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(matches!(
            AirdropMerkleTree::new(vec![]),
            Err(MerkleTreeError::EmptyInput)
        ));
        assert!(matches!(
            AirdropMerkleTree::new(vec![RawAllocation::new(ALICE, 0)]),
            Err(MerkleTreeError::InvalidAllocation(_))
        ));
        assert!(matches!(
            AirdropMerkleTree::new(vec![RawAllocation::new("0xdeadbeef", 10)]),
            Err(MerkleTreeError::InvalidAllocation(_))
        ));
    }

    #[test]
    fn test_total_beyond_u64_rejected() {
        let allocations = vec![
            RawAllocation::new(ALICE, u64::MAX),
            RawAllocation::new(BOB, 1),
        ];
        assert!(matches!(
            AirdropMerkleTree::new(allocations),
            Err(MerkleTreeError::InvalidAllocation(_))
        ));
    }

    #[test]
    fn test_write_and_read_artifact() {
        let tree = AirdropMerkleTree::new(three_allocations()).unwrap();
        let path = temp_path("artifact.json");
        tree.write_to_file(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["tokenTotal"], "0x02ee");
        assert_eq!(raw["claims"][BOB]["index"], 1);
        assert_eq!(raw["claims"][BOB]["amount"], "0x012c");
        assert_eq!(raw["claims"][CATHERINE]["proof"].as_array().unwrap().len(), 1);

        let read = AirdropMerkleTree::new_from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(read, tree);
    }

    #[test]
    fn test_tampered_artifact_rejected() {
        let tree = AirdropMerkleTree::new(three_allocations()).unwrap();

        let mut swapped_sibling = tree.to_artifact();
        swapped_sibling.claims.get_mut(ALICE).unwrap().proof[0] = encode_hash(&[7u8; 32]);
        assert!(matches!(
            AirdropMerkleTree::try_from(swapped_sibling),
            Err(MerkleValidationError(_))
        ));

        let mut inflated_total = tree.to_artifact();
        inflated_total.token_total = encode_amount(751);
        assert!(matches!(
            AirdropMerkleTree::try_from(inflated_total),
            Err(MerkleValidationError(_))
        ));

        let mut inflated_amount = tree.to_artifact();
        inflated_amount.claims.get_mut(BOB).unwrap().amount = encode_amount(301);
        inflated_amount.token_total = encode_amount(751);
        assert!(AirdropMerkleTree::try_from(inflated_amount).is_err());
    }

    #[test]
    fn test_new_from_balance_map() {
        let path = temp_path("balances.json");
        fs::write(
            &path,
            format!(r#"{{ "{ALICE}": 200, "{BOB}": "300", "{CATHERINE}": "0xfa" }}"#),
        )
        .unwrap();
        let tree = AirdropMerkleTree::new_from_balance_map(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(tree, AirdropMerkleTree::new(three_allocations()).unwrap());
        let map = tree.convert_to_hashmap();
        assert_eq!(map[&Pubkey::from_str(BOB).unwrap()].amount, 300);
        assert!(tree.get_node(&Pubkey::new_unique()).is_none());
    }

    #[test]
    fn test_balance_map_with_non_integer_amount_rejected() {
        let path = temp_path("float_balances.json");
        fs::write(&path, format!(r#"{{ "{ALICE}": 200.0, "{BOB}": 300 }}"#)).unwrap();
        let result = AirdropMerkleTree::new_from_balance_map(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(MerkleTreeError::InvalidAllocation(_))));
    }

    #[test]
    fn test_new_from_csv_rejects_duplicates() {
        let path = temp_path("balances.csv");
        fs::write(
            &path,
            format!("pubkey,amount\n{ALICE},200\n{BOB},300\n{ALICE},1\n"),
        )
        .unwrap();
        let result = AirdropMerkleTree::new_from_csv(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(MerkleTreeError::DuplicateAccount(_))));
    }
}
