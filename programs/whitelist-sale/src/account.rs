use anchor_lang::prelude::*;

pub const MAX_ROUNDS: usize = 10;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug)]
pub struct SaleParams {
    pub sale_owner: Pubkey,
    pub token_price: u64,               // lamports per PRICE_SCALE token base units
    pub amount_of_tokens_to_sell: u64,
    pub sale_end: i64,
    pub tokens_unlock_time: i64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Round {
    pub round_id: u8,
    pub start_time: i64,
    pub max_participation: u64,
}

impl Round {
    pub const SPACE: usize = 1 + 8 + 8;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registration {
    pub registration_time_starts: i64,
    pub registration_time_ends: i64,
    pub number_of_registrants: u64,
}

impl Registration {
    pub const SPACE: usize = 8 * 3;

    pub fn is_set(&self) -> bool {
        self.registration_time_ends != 0
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistrationInfo {
    pub registration_time_ends: i64,
    pub number_of_registrants: u64,
}

#[account]
#[derive(Default)]
pub struct Sale {
    pub sale_owner: Pubkey,
    pub admin_registry: Pubkey,
    pub token_mint: Pubkey,
    pub token_price: u64,
    pub amount_of_tokens_to_sell: u64,
    pub total_tokens_sold: u64,
    pub total_lamports_raised: u64,
    pub sale_end: i64,
    pub tokens_unlock_time: i64,
    pub registration: Registration,
    pub rounds: Vec<Round>,             // ascending by id and start time, ids start at 1
    pub earnings_withdrawn: bool,
    pub bump: u8,
    pub vault_bump: u8,
    pub custody_bump: u8,
}

impl Sale {
    pub const SPACE: usize = 32 * 3
        + 8 * 4
        + 8 * 2
        + Registration::SPACE
        + (4 + Round::SPACE * MAX_ROUNDS)
        + 1
        + 3;

    pub fn round(&self, round_id: u8) -> Option<&Round> {
        self.rounds.iter().find(|r| r.round_id == round_id)
    }

    pub fn round_mut(&mut self, round_id: u8) -> Option<&mut Round> {
        self.rounds.iter_mut().find(|r| r.round_id == round_id)
    }

    pub fn first_round_start(&self) -> Option<i64> {
        self.rounds.first().map(|r| r.start_time)
    }

    /// Id of the round running at `now`, 0 when none is.
    ///
    /// A round is active from its start time (inclusive) until the next
    /// round starts. There is no later boundary after the last round, so
    /// once it has started this returns 0.
    pub fn current_round(&self, now: i64) -> u8 {
        match self.first_round_start() {
            Some(start) if now >= start => self
                .rounds
                .iter()
                .position(|r| r.start_time > now)
                .map(|i| self.rounds[i - 1].round_id)
                .unwrap_or(0),
            _ => 0,
        }
    }

    pub fn registration_info(&self) -> RegistrationInfo {
        RegistrationInfo {
            registration_time_ends: self.registration.registration_time_ends,
            number_of_registrants: self.registration.number_of_registrants,
        }
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Participation {
    pub amount: u64,
    pub timestamp: i64,
    pub round_id: u8,
    pub is_withdrawn: bool,
}

impl Participation {
    pub const SPACE: usize = 8 + 8 + 1 + 1;
}

#[account]
#[derive(Default)]
pub struct Participant {
    pub user: Pubkey,
    pub registered_round: u8,           // 0 until registered
    pub has_participated: bool,
    pub participation: Participation,
    pub bump: u8,
}

impl Participant {
    pub const SPACE: usize = 32 + 1 + 1 + Participation::SPACE + 1;

    /// Records the owner of a freshly created entry; no-op afterwards.
    pub fn bind(&mut self, user: Pubkey, bump: u8) {
        if self.user == Pubkey::default() {
            self.user = user;
            self.bump = bump;
        }
    }
}

#[account]
pub struct SaleVault {}
