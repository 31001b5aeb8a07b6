use solana_program::{hash::hashv, pubkey::Pubkey};

/// Hash of a single allocation.
///
/// The preimage is fixed width: `index` as a big-endian `u64`, the 32 account
/// bytes, then `amount` as a big-endian `u64`. Leaf preimages are 48 bytes and
/// interior preimages are 64 bytes, so a leaf can never be mistaken for a node.
pub fn hash_leaf(index: u64, account: &Pubkey, amount: u64) -> [u8; 32] {
    hashv(&[
        &index.to_be_bytes(),
        account.as_ref(),
        &amount.to_be_bytes(),
    ])
    .to_bytes()
}

/// Combines two sibling hashes. The smaller hash (byte order) always goes first,
/// which makes the combine commutative and proofs free of left/right flags.
pub fn hash_pair(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    if a <= b {
        hashv(&[a, b]).to_bytes()
    } else {
        hashv(&[b, a]).to_bytes()
    }
}

/// Returns true if a `leaf` can be proved to be a part of a Merkle tree
/// defined by `root`. `proof` holds the sibling hashes on the branch from the
/// leaf to the root, bottom-up. Each pair of pre-images is assumed to be sorted.
pub fn verify(proof: &[[u8; 32]], root: [u8; 32], leaf: [u8; 32]) -> bool {
    let computed_hash = proof
        .iter()
        .fold(leaf, |computed_hash, proof_element| {
            hash_pair(&computed_hash, proof_element)
        });
    computed_hash == root
}

/// Recomputes the leaf for `(index, account, amount)` and folds `proof` onto it.
/// This is the single admission check used off-chain and on-chain.
pub fn verify_claim(
    root: [u8; 32],
    index: u64,
    account: &Pubkey,
    amount: u64,
    proof: &[[u8; 32]],
) -> bool {
    verify(proof, root, hash_leaf(index, account, amount))
}
