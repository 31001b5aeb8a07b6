use anchor_lang::{context::Context, prelude::*, Accounts, Key, Result, ToAccountInfo};
use anchor_spl::{
    token,
    token::{Token, TokenAccount},
};

use crate::{
    error::ErrorCode,
    state::{claimed_event::ClaimedEvent, merkle_distributor::MerkleDistributor},
};

/// [merkle_distributor::claim] accounts.
#[derive(Accounts)]
#[instruction(index: u64, account: Pubkey)]
pub struct Claim<'info> {
    /// The [MerkleDistributor].
    #[account(mut)]
    pub distributor: Account<'info, MerkleDistributor>,

    /// Distributor ATA containing the tokens to distribute.
    #[account(
        mut,
        associated_token::mint = distributor.mint,
        associated_token::authority = distributor.key(),
        address = distributor.token_vault
    )]
    pub from: Account<'info, TokenAccount>,

    /// Token account of the allocation's recipient.
    #[account(
        mut,
        token::mint = distributor.mint,
        constraint = to.owner == account @ ErrorCode::OwnerMismatch
    )]
    pub to: Account<'info, TokenAccount>,

    /// SPL [Token] program.
    pub token_program: Program<'info, Token>,
}

/// Pays out leaf `index` of the [MerkleDistributor] to `account`.
/// 1. Sets the leaf's bit in the claimed bitmap
/// 2. Increments num_nodes_claimed and total_amount_claimed
/// 3. Transfers amount to the recipient
/// CHECK:
///     1. The index is inside the tree and has not been claimed
///     2. The merkle proof is valid for (index, account, amount)
///     3. The vault holds at least amount
///     4. The recipient token account is owned by account
#[allow(clippy::result_large_err)]
pub fn handle_claim(
    ctx: Context<Claim>,
    index: u64,
    account: Pubkey,
    amount: u64,
    proof: Vec<[u8; 32]>,
) -> Result<()> {
    let distributor = &mut ctx.accounts.distributor;

    // the bit is set here, before the transfer below
    distributor.admit_claim(index, &account, amount, &proof)?;

    require!(
        ctx.accounts.from.amount >= amount,
        ErrorCode::InsufficientVaultBalance
    );

    let distributor = &ctx.accounts.distributor;
    let seeds = [
        MerkleDistributor::SEED,
        &distributor.campaign_id.to_le_bytes(),
        &[distributor.bump],
    ];

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            token::Transfer {
                from: ctx.accounts.from.to_account_info(),
                to: ctx.accounts.to.to_account_info(),
                authority: ctx.accounts.distributor.to_account_info(),
            },
        )
        .with_signer(&[&seeds[..]]),
        amount,
    )?;

    // Note: might get truncated, do not rely on
    msg!(
        "Claimed index {} for {}: {} tokens, {} of {} claimed",
        index,
        account,
        amount,
        distributor.total_amount_claimed,
        distributor.token_total,
    );
    emit!(ClaimedEvent {
        index,
        account,
        amount,
    });

    Ok(())
}
