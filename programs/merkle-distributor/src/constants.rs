use anchor_lang::prelude::*;

/// Seed for distributor PDA derivation, `["MerkleDistributor", campaign_id]`.
/// The campaign id alone keys the address, so an id can back at most one campaign.
#[constant]
pub const DISTRIBUTOR_SEED: &[u8] = b"MerkleDistributor";

/// Seed for the factory registry PDA, `["Factory"]`.
#[constant]
pub const FACTORY_SEED: &[u8] = b"Factory";

/// Largest tree a single distributor accepts. Keeps the account, bitmap included,
/// under the 10KiB limit for accounts created inside an instruction. Larger
/// allocation sets are split across several campaign ids.
#[constant]
pub const MAX_NUM_NODES: u64 = 32_768;

/// Number of leaf indices tracked by one bitmap word.
pub const BITS_PER_WORD: u64 = 256;
