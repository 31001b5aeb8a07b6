use anchor_lang::error_code;

/// Error codes.
#[error_code]
pub enum ErrorCode {
    #[msg("Invalid Merkle proof.")]
    InvalidProof,
    #[msg("Drop already claimed")]
    AlreadyClaimed,
    #[msg("Claim index is outside of the distributor's tree")]
    IndexOutOfRange,
    #[msg("Exceeded maximum claim amount")]
    ExceededMaxClaim,
    #[msg("Exceeded maximum node count")]
    MaxNodesExceeded,
    #[msg("Amount must be greater than zero")]
    InvalidAmount,
    #[msg("Merkle root cannot be empty")]
    InvalidRoot,
    #[msg("Insufficient token balance in source account")]
    InsufficientFunds,
    #[msg("Insufficient vault balance for this claim")]
    InsufficientVaultBalance,
    #[msg("Funding requested without a source token account")]
    MissingFundingAccount,
    #[msg("Token account owner did not match intended owner")]
    OwnerMismatch,
    #[msg("Arithmetic Error (overflow/underflow)")]
    ArithmeticError,
}
