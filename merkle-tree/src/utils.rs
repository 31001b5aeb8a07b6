use solana_program::pubkey::Pubkey;

use crate::{merkle_tree::MerkleTree, tree_node::TreeNode};

pub fn get_proof(merkle_tree: &MerkleTree, index: usize) -> Vec<[u8; 32]> {
    merkle_tree
        .find_path(index)
        .expect("index is a leaf of the tree")
}

/// Exact sum of all node amounts. Accumulates in a u128, which cannot overflow
/// for any number of u64 amounts a tree can hold.
pub fn get_token_total(nodes: &[TreeNode]) -> u128 {
    nodes.iter().map(|n| u128::from(n.amount())).sum()
}

/// Address of the distributor for `campaign_id`. Deploy tooling derives this up
/// front to tell whether a campaign already exists. The mint is not part of the
/// seeds, so one campaign id maps to one distributor across all mints.
pub fn get_merkle_distributor_pda(program_id: &Pubkey, campaign_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            b"MerkleDistributor".as_ref(),
            campaign_id.to_le_bytes().as_ref(),
        ],
        program_id,
    )
}

pub fn get_factory_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"Factory".as_ref()], program_id)
}
