use anyhow::anyhow;

use crate::*;

pub fn process_proof(proof_args: &ProofArgs) -> Result<()> {
    let merkle_tree = load_merkle_tree(&proof_args.merkle_tree_path)?;

    let node = merkle_tree
        .get_node(&proof_args.account)
        .ok_or_else(|| anyhow!("account {} not found in merkle tree", proof_args.account))?;

    let claim = serde_json::json!({
        "index": node.index,
        "account": node.claimant.to_string(),
        "amount": node.amount,
        "proof": node
            .proof
            .iter()
            .flatten()
            .map(encode_hash)
            .collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&claim)?);
    Ok(())
}
