use anchor_lang::{context::Context, prelude::*, Accounts, Key, ToAccountInfo};
use anchor_spl::{
    token,
    token::{Token, TokenAccount},
};

use crate::{
    error::ErrorCode,
    state::{claimed_event::DepositEvent, merkle_distributor::MerkleDistributor},
};

/// [merkle_distributor::deposit] accounts.
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// The [MerkleDistributor].
    #[account(mut)]
    pub distributor: Account<'info, MerkleDistributor>,

    /// Distributor ATA receiving the tokens.
    #[account(mut, address = distributor.token_vault)]
    pub token_vault: Account<'info, TokenAccount>,

    /// Token account the deposit is pulled from.
    #[account(
        mut,
        token::mint = distributor.mint,
        token::authority = depositor,
    )]
    pub source: Account<'info, TokenAccount>,

    /// Owner of `source`. Anyone may fund a distributor.
    pub depositor: Signer<'info>,

    /// SPL [Token] program.
    pub token_program: Program<'info, Token>,
}

/// Moves `amount` tokens from the depositor into the distributor's vault.
/// CHECK:
///     1. amount is non-zero
///     2. The source account holds at least amount
#[allow(clippy::result_large_err)]
pub fn handle_deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    require!(amount > 0, ErrorCode::InvalidAmount);
    require!(
        ctx.accounts.source.amount >= amount,
        ErrorCode::InsufficientFunds
    );

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            token::Transfer {
                from: ctx.accounts.source.to_account_info(),
                to: ctx.accounts.token_vault.to_account_info(),
                authority: ctx.accounts.depositor.to_account_info(),
            },
        ),
        amount,
    )?;

    let distributor = &mut ctx.accounts.distributor;
    distributor.record_deposit(amount)?;

    msg!(
        "Deposited {} into campaign {}, total deposited {}",
        amount,
        distributor.campaign_id,
        distributor.total_deposited
    );
    emit!(DepositEvent {
        distributor: distributor.key(),
        depositor: ctx.accounts.depositor.key(),
        amount,
        total_deposited: distributor.total_deposited,
    });

    Ok(())
}
