use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::MerkleTreeError::{self, MerkleValidationError};

pub type Result<T> = std::result::Result<T, MerkleTreeError>;

/// Persisted build output, shared with deployment and claiming tooling.
///
/// Hashes are `0x`-prefixed hex, amounts are minimal even-length `0x` hex and
/// `claims` is ordered by leaf index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionArtifact {
    pub root: String,
    pub token_total: String,
    pub claims: IndexMap<String, ClaimInfo>,
}

/// Everything a recipient needs to submit `claim`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimInfo {
    pub index: u64,
    pub amount: String,
    pub proof: Vec<String>,
}

pub fn encode_hash(hash: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(hash))
}

pub fn decode_hash(text: &str) -> Result<[u8; 32]> {
    let digits = strip_hex_prefix(text)?;
    let mut out = [0u8; 32];
    hex::decode_to_slice(digits, &mut out)
        .map_err(|e| MerkleValidationError(format!("invalid hash {text:?}: {e}")))?;
    Ok(out)
}

pub fn encode_amount(amount: u64) -> String {
    let bytes = amount.to_be_bytes();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
    format!("0x{}", hex::encode(&bytes[first..]))
}

pub fn decode_amount(text: &str) -> Result<u64> {
    let digits = strip_hex_prefix(text)?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| MerkleValidationError(format!("invalid amount {text:?}: {e}")))
}

fn strip_hex_prefix(text: &str) -> Result<&str> {
    text.strip_prefix("0x")
        .ok_or_else(|| MerkleValidationError(format!("{text:?} is missing the 0x prefix")))
}
