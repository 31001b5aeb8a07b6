use anchor_lang::prelude::*;

use crate::{constants::FACTORY_SEED, error::ErrorCode};

/// Append-only registry of deployed distributors.
#[account]
#[derive(Default, Debug)]
pub struct Factory {
    /// Bump seed.
    pub bump: u8,
    /// Number of distributors deployed so far; the next one gets this as its sequence.
    pub distributor_count: u64,
}

impl Factory {
    pub const SEED: &'static [u8] = FACTORY_SEED;
    pub const LEN: usize = 8 + std::mem::size_of::<Factory>();

    /// Reserves the next sequence number.
    pub fn register(&mut self) -> std::result::Result<u64, ErrorCode> {
        let sequence = self.distributor_count;
        self.distributor_count = sequence
            .checked_add(1)
            .ok_or(ErrorCode::ArithmeticError)?;
        Ok(sequence)
    }
}
