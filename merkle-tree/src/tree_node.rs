use distributor_merkle_verify::hash_leaf;
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

/// Represents the claim information for an account.
#[derive(Debug, Clone, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Position of the leaf; also the bit claimed in the on-chain bitmap
    pub index: u64,
    /// Pubkey of the claimant; tokens are only ever sent to this account
    pub claimant: Pubkey,
    /// Amount that claimant can claim
    pub amount: u64,
    /// Claimant's proof of inclusion in the Merkle Tree
    pub proof: Option<Vec<[u8; 32]>>,
}

impl TreeNode {
    pub fn hash(&self) -> [u8; 32] {
        hash_leaf(self.index, &self.claimant, self.amount)
    }

    /// Return amount for this claimant
    pub fn amount(&self) -> u64 {
        self.amount
    }
}
