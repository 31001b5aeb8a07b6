//! A program for distributing tokens efficiently via uploading a [Merkle root](https://en.wikipedia.org/wiki/Merkle_tree).
//!
//! Each campaign is a [MerkleDistributor](state::merkle_distributor::MerkleDistributor) account
//! created through the factory instruction [merkle_distributor::new_distributor]. The campaign
//! commits to a root and a token total at creation; recipients then call
//! [merkle_distributor::claim] with the proof produced off-chain by `distributor-merkle-tree`.
//!
//! # Claim tracking
//!
//! Instead of one claim-status account per recipient, every distributor carries a bitmap with one
//! bit per leaf index. A claim flips its bit before any tokens move, and a set bit is never
//! cleared, so each allocation can be paid out at most once and the cumulative payout can never
//! exceed the committed total.
//!
//! # Addressing
//!
//! Distributors live at `["MerkleDistributor", campaign_id]`, so a campaign id names exactly one
//! campaign regardless of its mint. Deployment tooling derives the address first and only deploys
//! when nothing is there; a second deploy for the same campaign id fails because the account
//! already exists.

#![allow(clippy::too_many_arguments)]
use anchor_lang::prelude::*;
use instructions::*;

pub mod constants;
pub mod error;
pub mod instructions;
pub mod state;

declare_id!("25BtG9B9Asv7u6hS3hz9peTixknYvVfqaKUBNbhfpqZY");

#[program]
pub mod merkle_distributor {
    use super::*;

    /// Creates the registry every distributor is appended to. Called once per deployment.
    #[allow(clippy::result_large_err)]
    pub fn initialize_factory(ctx: Context<InitializeFactory>) -> Result<()> {
        handle_initialize_factory(ctx)
    }

    /// Deploys a new campaign bound to `mint` and `root`.
    ///
    /// With `fund` set, `token_total` is pulled from the caller's token account in the same
    /// instruction; otherwise the campaign starts empty and is funded through [deposit].
    #[allow(clippy::result_large_err)]
    pub fn new_distributor(
        ctx: Context<NewDistributor>,
        campaign_id: u64,
        root: [u8; 32],
        token_total: u64,
        max_num_nodes: u64,
        fund: bool,
    ) -> Result<()> {
        handle_new_distributor(ctx, campaign_id, root, token_total, max_num_nodes, fund)
    }

    #[allow(clippy::result_large_err)]
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        handle_deposit(ctx, amount)
    }

    #[allow(clippy::result_large_err)]
    pub fn claim(
        ctx: Context<Claim>,
        index: u64,
        account: Pubkey,
        amount: u64,
        proof: Vec<[u8; 32]>,
    ) -> Result<()> {
        handle_claim(ctx, index, account, amount, proof)
    }
}
