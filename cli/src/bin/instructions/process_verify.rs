use tracing::info;

use crate::*;

pub fn process_verify(verify_args: &VerifyArgs) -> Result<()> {
    let merkle_tree = load_merkle_tree(&verify_args.merkle_tree_path)?;

    info!(
        "verified {} proofs against root {}, token total {}",
        merkle_tree.max_num_nodes,
        encode_hash(&merkle_tree.merkle_root),
        merkle_tree.token_total
    );
    Ok(())
}
