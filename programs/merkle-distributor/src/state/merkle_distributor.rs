use anchor_lang::{
    account,
    prelude::{Pubkey, *},
};
use distributor_merkle_verify::verify_claim;

use crate::{
    constants::{BITS_PER_WORD, DISTRIBUTOR_SEED},
    error::ErrorCode,
};

/// One 256-bit bitmap word, stored as four little-endian limbs.
pub type BitmapWord = [u64; 4];

/// State for the account which distributes tokens.
#[account]
#[derive(Default, Debug)]
pub struct MerkleDistributor {
    /// Bump seed.
    pub bump: u8,
    /// Campaign id, part of the PDA seeds
    pub campaign_id: u64,
    /// Position of this distributor in the factory registry
    pub sequence: u64,
    /// The 256-bit merkle root.
    pub root: [u8; 32],
    /// [Mint] of the token to be distributed.
    pub mint: Pubkey,
    /// Token Address of the vault
    pub token_vault: Pubkey,
    /// Wallet that deployed the campaign
    pub admin: Pubkey,
    /// Sum of every allocation committed to by `root`.
    pub token_total: u64,
    /// Number of leaves in the tree; valid claim indices are `0..max_num_nodes`.
    pub max_num_nodes: u64,
    /// Total amount of tokens moved into the vault through this program.
    pub total_deposited: u64,
    /// Total amount of tokens that have been claimed.
    pub total_amount_claimed: u64,
    /// Number of nodes that have been claimed.
    pub num_nodes_claimed: u64,
    /// Word `index / 256`, bit `index % 256` is set once leaf `index` has been claimed.
    pub claimed_bitmap: Vec<BitmapWord>,
}

impl MerkleDistributor {
    pub const SEED: &'static [u8] = DISTRIBUTOR_SEED;

    /// Discriminator, fixed-size fields and the bitmap's length prefix.
    pub const FIXED_LEN: usize = 8 + 1 + 8 + 8 + 32 + 32 + 32 + 32 + 8 * 5 + 4;

    /// Account size for a tree of `max_num_nodes` leaves.
    pub fn space(max_num_nodes: u64) -> usize {
        Self::FIXED_LEN + bitmap_words(max_num_nodes) * std::mem::size_of::<BitmapWord>()
    }

    pub fn is_claimed(&self, index: u64) -> bool {
        let (word, limb, mask) = bitmap_position(index);
        self.claimed_bitmap
            .get(word)
            .map_or(false, |w| w[limb] & mask != 0)
    }

    fn set_claimed(&mut self, index: u64) {
        let (word, limb, mask) = bitmap_position(index);
        self.claimed_bitmap[word][limb] |= mask;
    }

    /// Admission check and bookkeeping for one claim. On success the leaf's bit is
    /// set and the counters include `amount`; the caller moves the tokens afterwards.
    /// On error nothing has been modified.
    pub fn admit_claim(
        &mut self,
        index: u64,
        account: &Pubkey,
        amount: u64,
        proof: &[[u8; 32]],
    ) -> std::result::Result<(), ErrorCode> {
        if index >= self.max_num_nodes {
            return Err(ErrorCode::IndexOutOfRange);
        }
        if self.is_claimed(index) {
            return Err(ErrorCode::AlreadyClaimed);
        }
        if !verify_claim(self.root, index, account, amount, proof) {
            return Err(ErrorCode::InvalidProof);
        }

        let num_nodes_claimed = self
            .num_nodes_claimed
            .checked_add(1)
            .ok_or(ErrorCode::ArithmeticError)?;
        let total_amount_claimed = self
            .total_amount_claimed
            .checked_add(amount)
            .ok_or(ErrorCode::ArithmeticError)?;
        if total_amount_claimed > self.token_total {
            return Err(ErrorCode::ExceededMaxClaim);
        }

        self.set_claimed(index);
        self.num_nodes_claimed = num_nodes_claimed;
        self.total_amount_claimed = total_amount_claimed;
        Ok(())
    }

    pub fn record_deposit(&mut self, amount: u64) -> std::result::Result<(), ErrorCode> {
        if amount == 0 {
            return Err(ErrorCode::InvalidAmount);
        }
        self.total_deposited = self
            .total_deposited
            .checked_add(amount)
            .ok_or(ErrorCode::ArithmeticError)?;
        Ok(())
    }
}

pub fn bitmap_words(max_num_nodes: u64) -> usize {
    max_num_nodes.div_ceil(BITS_PER_WORD) as usize
}

fn bitmap_position(index: u64) -> (usize, usize, u64) {
    let word = (index / BITS_PER_WORD) as usize;
    let bit = index % BITS_PER_WORD;
    (word, (bit / 64) as usize, 1u64 << (bit % 64))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use distributor_merkle_tree::{
        airdrop_merkle_tree::AirdropMerkleTree, allocation::RawAllocation,
    };

    use super::*;
    use crate::constants::MAX_NUM_NODES;

    fn three_account_tree() -> AirdropMerkleTree {
        AirdropMerkleTree::new(vec![
            RawAllocation::new(Pubkey::new_from_array([1u8; 32]).to_string(), 200),
            RawAllocation::new(Pubkey::new_from_array([2u8; 32]).to_string(), 300),
            RawAllocation::new(Pubkey::new_from_array([3u8; 32]).to_string(), 250),
        ])
        .unwrap()
    }

    fn distributor_for(tree: &AirdropMerkleTree) -> MerkleDistributor {
        MerkleDistributor {
            root: tree.merkle_root,
            token_total: tree.token_total,
            max_num_nodes: tree.max_num_nodes,
            claimed_bitmap: vec![[0u64; 4]; bitmap_words(tree.max_num_nodes)],
            ..Default::default()
        }
    }

    #[test]
    fn test_space_fits_instruction_allocation_limit() {
        assert!(MerkleDistributor::space(MAX_NUM_NODES) <= 10 * 1024);
        assert_eq!(MerkleDistributor::space(1), MerkleDistributor::FIXED_LEN + 32);
        assert_eq!(MerkleDistributor::space(256), MerkleDistributor::FIXED_LEN + 32);
        assert_eq!(MerkleDistributor::space(257), MerkleDistributor::FIXED_LEN + 64);
    }

    #[test]
    fn test_serialized_size_matches_space() {
        let mut distributor = MerkleDistributor {
            max_num_nodes: 1000,
            claimed_bitmap: vec![[0u64; 4]; bitmap_words(1000)],
            ..Default::default()
        };
        distributor.set_claimed(999);
        let mut data = Vec::new();
        distributor.try_serialize(&mut data).unwrap();
        assert_eq!(data.len(), MerkleDistributor::space(1000));
    }

    #[test]
    fn test_bitmap_words_are_independent() {
        let mut distributor = MerkleDistributor {
            max_num_nodes: 600,
            claimed_bitmap: vec![[0u64; 4]; bitmap_words(600)],
            ..Default::default()
        };
        for index in [0, 63, 64, 255, 256, 599] {
            assert!(!distributor.is_claimed(index));
            distributor.set_claimed(index);
            assert!(distributor.is_claimed(index));
        }
        assert!(!distributor.is_claimed(1));
        assert!(!distributor.is_claimed(257));
        assert_eq!(distributor.claimed_bitmap[0], [1 | 1u64 << 63, 1, 0, 1u64 << 63]);
        assert_eq!(distributor.claimed_bitmap[1][0], 1);
        assert!(!distributor.is_claimed(10_000));
    }

    #[test]
    fn test_all_claims_drain_the_campaign() {
        let tree = three_account_tree();
        let mut distributor = distributor_for(&tree);
        distributor.record_deposit(tree.token_total).unwrap();

        let mut vault = distributor.total_deposited;
        let mut balances: HashMap<Pubkey, u64> = HashMap::new();
        for node in tree.tree_nodes.iter() {
            let proof = node.proof.as_ref().unwrap();
            distributor
                .admit_claim(node.index, &node.claimant, node.amount, proof)
                .unwrap();
            vault -= node.amount;
            *balances.entry(node.claimant).or_default() += node.amount;

            assert!(matches!(
                distributor.admit_claim(node.index, &node.claimant, node.amount, proof),
                Err(ErrorCode::AlreadyClaimed)
            ));
        }

        assert_eq!(vault, 0);
        assert_eq!(distributor.total_amount_claimed, 750);
        assert_eq!(distributor.num_nodes_claimed, 3);
        for node in tree.tree_nodes.iter() {
            assert_eq!(balances[&node.claimant], node.amount);
        }
    }

    #[test]
    fn test_tampered_proof_leaves_state_untouched() {
        let tree = three_account_tree();
        let mut distributor = distributor_for(&tree);
        let node = &tree.tree_nodes[0];
        let mut proof = node.proof.clone().unwrap();
        proof[0] = [0x5au8; 32];

        assert!(matches!(
            distributor.admit_claim(node.index, &node.claimant, node.amount, &proof),
            Err(ErrorCode::InvalidProof)
        ));
        assert!(!distributor.is_claimed(node.index));
        assert_eq!(distributor.total_amount_claimed, 0);
        assert_eq!(distributor.num_nodes_claimed, 0);

        // the genuine proof still works afterwards
        let proof = node.proof.as_ref().unwrap();
        distributor
            .admit_claim(node.index, &node.claimant, node.amount, proof)
            .unwrap();
    }

    #[test]
    fn test_claim_arguments_must_match_leaf() {
        let tree = three_account_tree();
        let mut distributor = distributor_for(&tree);
        let node = &tree.tree_nodes[1];
        let proof = node.proof.as_ref().unwrap();
        let stranger = Pubkey::new_unique();

        for (index, account, amount) in [
            (0, node.claimant, node.amount),
            (node.index, stranger, node.amount),
            (node.index, node.claimant, node.amount + 1),
        ] {
            assert!(matches!(
                distributor.admit_claim(index, &account, amount, proof),
                Err(ErrorCode::InvalidProof)
            ));
        }
        assert!(matches!(
            distributor.admit_claim(3, &node.claimant, node.amount, proof),
            Err(ErrorCode::IndexOutOfRange)
        ));
        assert_eq!(distributor.claimed_bitmap, vec![[0u64; 4]]);
    }

    #[test]
    fn test_claims_cannot_exceed_token_total() {
        let tree = three_account_tree();
        let mut distributor = distributor_for(&tree);
        // a root committing to more than the recorded total
        distributor.token_total = 400;

        let (alice, bob) = (&tree.tree_nodes[0], &tree.tree_nodes[1]);
        let alice_proof = alice.proof.as_ref().unwrap();
        let bob_proof = bob.proof.as_ref().unwrap();
        distributor
            .admit_claim(alice.index, &alice.claimant, alice.amount, alice_proof)
            .unwrap();
        assert!(matches!(
            distributor.admit_claim(bob.index, &bob.claimant, bob.amount, bob_proof),
            Err(ErrorCode::ExceededMaxClaim)
        ));
        assert!(!distributor.is_claimed(bob.index));
        assert_eq!(distributor.total_amount_claimed, 200);
    }

    #[test]
    fn test_record_deposit() {
        let mut distributor = MerkleDistributor::default();
        assert!(matches!(
            distributor.record_deposit(0),
            Err(ErrorCode::InvalidAmount)
        ));
        distributor.record_deposit(500).unwrap();
        distributor.record_deposit(250).unwrap();
        assert_eq!(distributor.total_deposited, 750);
        distributor.total_deposited = u64::MAX;
        assert!(matches!(
            distributor.record_deposit(1),
            Err(ErrorCode::ArithmeticError)
        ));
    }

    #[test]
    fn test_pda_matches_off_chain_derivation() {
        let (expected, _) = Pubkey::find_program_address(
            &[MerkleDistributor::SEED, 7u64.to_le_bytes().as_ref()],
            &crate::ID,
        );
        let (derived, _) =
            distributor_merkle_tree::utils::get_merkle_distributor_pda(&crate::ID, 7);
        assert_eq!(derived, expected);
    }
}
