use anchor_lang::{context::Context, prelude::*, Accounts, Key};

use crate::state::factory::Factory;

/// Accounts for [merkle_distributor::initialize_factory]. The factory carries no
/// authority: deploying campaigns is permissionless.
#[derive(Accounts)]
pub struct InitializeFactory<'info> {
    /// [Factory] registry.
    #[account(
        init,
        seeds = [Factory::SEED],
        bump,
        space = Factory::LEN,
        payer = payer
    )]
    pub factory: Account<'info, Factory>,

    /// Pays for the registry account.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The [System] program.
    pub system_program: Program<'info, System>,
}

#[allow(clippy::result_large_err)]
pub fn handle_initialize_factory(ctx: Context<InitializeFactory>) -> Result<()> {
    let factory = &mut ctx.accounts.factory;

    factory.bump = ctx.bumps.factory;
    factory.distributor_count = 0;

    msg!("Factory initialized by {}", ctx.accounts.payer.key());

    Ok(())
}
