//! Off-chain side of the merkle distributor.
//!
//! Turns a raw allocation set (JSON balance map or CSV) into a Merkle root, the
//! exact token total and one proof per account, and persists the result as the
//! claim artifact consumed by deployment and claiming tooling.

pub mod airdrop_merkle_tree;
pub mod allocation;
pub mod artifact;
pub mod csv_entry;
pub mod error;
pub mod merkle_tree;
pub mod tree_node;
pub mod utils;
