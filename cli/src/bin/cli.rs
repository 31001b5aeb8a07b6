extern crate distributor_merkle_tree;
extern crate merkle_distributor;

mod instructions;

use std::path::{Path, PathBuf};

use anchor_lang::prelude::Pubkey;
use anyhow::Result;
use clap::{Parser, Subcommand};
use distributor_merkle_tree::{
    airdrop_merkle_tree::AirdropMerkleTree,
    artifact::encode_hash,
    utils::{get_factory_pda, get_merkle_distributor_pda},
};
use instructions::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Commands,

    /// Program id
    #[clap(long, env, default_value_t = merkle_distributor::id())]
    pub program_id: Pubkey,
}

// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a Merkle tree artifact, given a JSON balance map or a CSV of recipients
    CreateMerkleTree(CreateMerkleTreeArgs),
    /// Reload an artifact and check every proof against its root
    Verify(VerifyArgs),
    /// Print the claim arguments for one account
    Proof(ProofArgs),
    /// Derive the distributor, vault and factory addresses of a campaign
    DistributorAddress(DistributorAddressArgs),
}

#[derive(Parser, Debug)]
pub struct CreateMerkleTreeArgs {
    /// Balances path; `.csv` files need a `pubkey,amount` header, anything else is read as JSON
    #[clap(long, env)]
    pub balances_path: PathBuf,

    /// Merkle tree out path
    #[clap(long, env)]
    pub merkle_tree_path: PathBuf,
}

#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Merkle tree artifact path
    #[clap(long, env)]
    pub merkle_tree_path: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ProofArgs {
    /// Merkle tree artifact path
    #[clap(long, env)]
    pub merkle_tree_path: PathBuf,

    /// Account to look up
    #[clap(long, env)]
    pub account: Pubkey,
}

#[derive(Parser, Debug)]
pub struct DistributorAddressArgs {
    /// SPL Mint address, used to derive the vault
    #[clap(long, env)]
    pub mint: Pubkey,

    #[clap(long, env)]
    pub campaign_id: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    match &args.command {
        Commands::CreateMerkleTree(merkle_tree_args) => {
            process_create_merkle_tree(merkle_tree_args)?;
        }
        Commands::Verify(verify_args) => {
            process_verify(verify_args)?;
        }
        Commands::Proof(proof_args) => {
            process_proof(proof_args)?;
        }
        Commands::DistributorAddress(address_args) => {
            process_distributor_address(&args, address_args);
        }
    }

    Ok(())
}

fn load_merkle_tree(path: &Path) -> Result<AirdropMerkleTree> {
    AirdropMerkleTree::new_from_file(path)
        .map_err(|e| anyhow::anyhow!("failed to load merkle tree from {}: {e}", path.display()))
}
