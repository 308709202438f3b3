use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Caller is not an admin")]
    NotAdmin,
    #[msg("Caller is not the sale owner")]
    NotSaleOwner,
    #[msg("Purchases must be invoked directly by the buyer")]
    NotDirectCaller,
    #[msg("Admin registry does not match the sale")]
    InvalidAdminRegistry,
    #[msg("Signature is invalid or not issued by an admin")]
    InvalidSignature,

    #[msg("Registration has not started yet")]
    RegistrationNotStarted,
    #[msg("Registration gate is closed")]
    RegistrationClosed,
    #[msg("Sale has already started")]
    SaleAlreadyStarted,
    #[msg("Round is not active")]
    RoundNotActive,
    #[msg("Tokens can not be withdrawn yet")]
    TokensLocked,
    #[msg("Sale has not ended yet")]
    SaleNotEnded,

    #[msg("User can not register twice")]
    AlreadyRegistered,
    #[msg("User can participate only once")]
    AlreadyParticipated,
    #[msg("Tokens already withdrawn")]
    AlreadyWithdrawn,
    #[msg("User did not participate in the sale")]
    NothingToWithdraw,
    #[msg("Tokens are already deposited")]
    TokensAlreadyDeposited,
    #[msg("Earnings are already withdrawn")]
    EarningsAlreadyWithdrawn,
    #[msg("Registration time is already set")]
    RegistrationAlreadySet,
    #[msg("Rounds are already set")]
    RoundsAlreadySet,
    #[msg("Rounds are not set")]
    RoundsNotSet,

    #[msg("Overflowing maximal participation for this round")]
    ExceedsRoundCap,
    #[msg("Trying to buy more than allowed")]
    ExceedsAllowedAmount,
    #[msg("Not enough tokens left for sale")]
    ExceedsSaleCapacity,
    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Round id is invalid")]
    InvalidRoundId,
    #[msg("Arrays length mismatch")]
    LengthMismatch,
    #[msg("Too many rounds")]
    TooManyRounds,
    #[msg("Round start times are invalid")]
    InvalidRoundStart,
    #[msg("Max participation must be positive")]
    InvalidMaxParticipation,
    #[msg("Token price must be positive")]
    InvalidPrice,
    #[msg("Amount of tokens to sell must be positive")]
    InvalidAmount,
    #[msg("Time parameters are invalid")]
    InvalidTime,
    #[msg("Token account does not match the sale")]
    InvalidTokenAccount,
    #[msg("Token account is required to receive leftover")]
    MissingTokenAccount,
    #[msg("Burn account must be owned by the incinerator")]
    InvalidBurnAccount,
    #[msg("Burn account is required when burning leftover")]
    MissingBurnAccount,
}
