use anyhow::{bail, Context};
use merkle_distributor::constants::MAX_NUM_NODES;
use tracing::info;

use crate::*;

pub fn process_create_merkle_tree(merkle_tree_args: &CreateMerkleTreeArgs) -> Result<()> {
    let balances_path = &merkle_tree_args.balances_path;
    let is_csv = balances_path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));

    let merkle_tree = if is_csv {
        AirdropMerkleTree::new_from_csv(balances_path)
    } else {
        AirdropMerkleTree::new_from_balance_map(balances_path)
    }
    .with_context(|| format!("failed to build merkle tree from {}", balances_path.display()))?;

    if merkle_tree.max_num_nodes > MAX_NUM_NODES {
        bail!(
            "{} allocations exceed the {} a single distributor can track; split them across campaigns",
            merkle_tree.max_num_nodes,
            MAX_NUM_NODES
        );
    }

    merkle_tree
        .write_to_file(&merkle_tree_args.merkle_tree_path)
        .with_context(|| {
            format!(
                "failed to write merkle tree to {}",
                merkle_tree_args.merkle_tree_path.display()
            )
        })?;

    info!(
        "wrote merkle tree with root {} and token total {} for {} accounts to {}",
        encode_hash(&merkle_tree.merkle_root),
        merkle_tree.token_total,
        merkle_tree.max_num_nodes,
        merkle_tree_args.merkle_tree_path.display()
    );
    Ok(())
}
