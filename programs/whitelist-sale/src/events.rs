use anchor_lang::prelude::*;

#[event]
pub struct SaleCreated {
    pub sale: Pubkey,
    pub sale_owner: Pubkey,
    pub token_price: u64,
    pub amount_of_tokens_to_sell: u64,
    pub sale_end: i64,
    pub tokens_unlock_time: i64,
}

#[event]
pub struct RegistrationTimeSet {
    pub registration_time_starts: i64,
    pub registration_time_ends: i64,
}

#[event]
pub struct RoundAdded {
    pub round_id: u8,
    pub start_time: i64,
    pub max_participation: u64,
}

#[event]
pub struct UserRegistered {
    pub user: Pubkey,
    pub round_id: u8,
}

#[event]
pub struct TokenPriceSet {
    pub new_price: u64,
}

#[event]
pub struct MaxParticipationSet {
    pub round_id: u8,
    pub max_participation: u64,
}

#[event]
pub struct SalePostponed {
    pub time_shifted: i64,
    pub first_round_start: i64,
}

#[event]
pub struct RegistrationPeriodExtended {
    pub registration_time_ends: i64,
}

#[event]
pub struct TokensDeposited {
    pub depositor: Pubkey,
    pub amount: u64,
}

#[event]
pub struct TokensSold {
    pub user: Pubkey,
    pub amount: u64,
    pub round_id: u8,
}

#[event]
pub struct TokensWithdrawn {
    pub user: Pubkey,
    pub amount: u64,
}

#[event]
pub struct EarningsWithdrawn {
    pub sale_owner: Pubkey,
    pub amount: u64,
}

#[event]
pub struct LeftoverWithdrawn {
    pub sale_owner: Pubkey,
    pub amount: u64,
}

#[event]
pub struct LeftoverBurned {
    pub amount: u64,
}
