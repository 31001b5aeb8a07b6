use anchor_lang::{context::Context, prelude::*, Accounts, Key, ToAccountInfo};
use anchor_spl::{
    associated_token::AssociatedToken,
    token,
    token::{Mint, Token, TokenAccount},
};

use crate::{
    constants::MAX_NUM_NODES,
    error::ErrorCode,
    state::{
        claimed_event::NewDistributorEvent,
        factory::Factory,
        merkle_distributor::{bitmap_words, MerkleDistributor},
    },
};

/// Accounts for [merkle_distributor::new_distributor].
#[derive(Accounts)]
#[instruction(campaign_id: u64, root: [u8; 32], token_total: u64, max_num_nodes: u64)]
pub struct NewDistributor<'info> {
    /// [Factory] registry the new distributor is appended to.
    #[account(
        mut,
        seeds = [Factory::SEED],
        bump = factory.bump
    )]
    pub factory: Account<'info, Factory>,

    /// [MerkleDistributor]. Creation fails if the campaign id is already taken,
    /// whatever mint the existing campaign distributes.
    #[account(
        init,
        seeds = [
            MerkleDistributor::SEED,
            campaign_id.to_le_bytes().as_ref()
        ],
        bump,
        space = MerkleDistributor::space(max_num_nodes.min(MAX_NUM_NODES)),
        payer = admin
    )]
    pub distributor: Account<'info, MerkleDistributor>,

    /// The mint to distribute.
    pub mint: Account<'info, Mint>,

    /// Token vault, owned by the distributor. The address is predictable, so it
    /// may already have been created by someone else.
    #[account(
        init_if_needed,
        payer = admin,
        associated_token::mint = mint,
        associated_token::authority = distributor,
    )]
    pub token_vault: Account<'info, TokenAccount>,

    /// Admin token account `token_total` is pulled from when funding at deployment.
    #[account(
        mut,
        token::mint = mint,
        token::authority = admin,
    )]
    pub source: Option<Account<'info, TokenAccount>>,

    /// Admin wallet, responsible for creating the distributor and paying for the transaction.
    #[account(mut)]
    pub admin: Signer<'info>,

    /// The [System] program.
    pub system_program: Program<'info, System>,

    /// The [Associated Token] program.
    pub associated_token_program: Program<'info, AssociatedToken>,

    /// The [Token] program.
    pub token_program: Program<'info, Token>,
}

/// Creates a new [MerkleDistributor] and registers it with the [Factory].
/// When `fund` is false the vault starts empty and is filled through `deposit`.
/// CHECK:
///     1. The root is not empty
///     2. The token total is non-zero
///     3. The tree has between 1 and MAX_NUM_NODES leaves
///     4. When funding, the admin's source account holds at least token_total
#[allow(clippy::result_large_err)]
pub fn handle_new_distributor(
    ctx: Context<NewDistributor>,
    campaign_id: u64,
    root: [u8; 32],
    token_total: u64,
    max_num_nodes: u64,
    fund: bool,
) -> Result<()> {
    require!(root != [0u8; 32], ErrorCode::InvalidRoot);
    require!(token_total > 0, ErrorCode::InvalidAmount);
    require!(
        max_num_nodes > 0 && max_num_nodes <= MAX_NUM_NODES,
        ErrorCode::MaxNodesExceeded
    );

    let sequence = ctx.accounts.factory.register()?;

    let distributor = &mut ctx.accounts.distributor;

    distributor.bump = ctx.bumps.distributor;
    distributor.campaign_id = campaign_id;
    distributor.sequence = sequence;
    distributor.root = root;
    distributor.mint = ctx.accounts.mint.key();
    distributor.token_vault = ctx.accounts.token_vault.key();
    distributor.admin = ctx.accounts.admin.key();
    distributor.token_total = token_total;
    distributor.max_num_nodes = max_num_nodes;
    distributor.total_deposited = 0;
    distributor.total_amount_claimed = 0;
    distributor.num_nodes_claimed = 0;
    distributor.claimed_bitmap = vec![[0u64; 4]; bitmap_words(max_num_nodes)];

    if fund {
        let source = ctx
            .accounts
            .source
            .as_ref()
            .ok_or(ErrorCode::MissingFundingAccount)?;
        require!(source.amount >= token_total, ErrorCode::InsufficientFunds);

        token::transfer(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                token::Transfer {
                    from: source.to_account_info(),
                    to: ctx.accounts.token_vault.to_account_info(),
                    authority: ctx.accounts.admin.to_account_info(),
                },
            ),
            token_total,
        )?;

        ctx.accounts.distributor.record_deposit(token_total)?;
    }

    let distributor = &ctx.accounts.distributor;

    // Note: might get truncated, do not rely on
    msg! {
        "New distributor created with campaign_id = {}, sequence = {}, mint = {}, vault = {}, token_total = {}, max_nodes = {}, funded = {}",
            distributor.campaign_id,
            distributor.sequence,
            distributor.mint,
            distributor.token_vault,
            distributor.token_total,
            distributor.max_num_nodes,
            fund,
    };

    emit!(NewDistributorEvent {
        distributor: distributor.key(),
        campaign_id,
        sequence,
        mint: distributor.mint,
        root,
        token_total,
        funded: fund,
    });

    Ok(())
}
