use anchor_lang::{event, prelude::*};

/// Emitted once per successful [new_distributor](crate::merkle_distributor::new_distributor).
#[event]
pub struct NewDistributorEvent {
    /// Address of the new distributor.
    pub distributor: Pubkey,
    pub campaign_id: u64,
    /// Position in the factory registry.
    pub sequence: u64,
    pub mint: Pubkey,
    pub root: [u8; 32],
    pub token_total: u64,
    /// Whether `token_total` was pulled from the creator during deployment.
    pub funded: bool,
}

/// Emitted when tokens are deposited into a distributor's vault.
#[event]
pub struct DepositEvent {
    pub distributor: Pubkey,
    pub depositor: Pubkey,
    pub amount: u64,
    pub total_deposited: u64,
}

/// Emitted when tokens are claimed.
#[event]
pub struct ClaimedEvent {
    /// Leaf index that was claimed.
    pub index: u64,
    /// Account the tokens were sent to.
    pub account: Pubkey,
    /// Amount of tokens distributed.
    pub amount: u64,
}
