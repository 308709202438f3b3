//! Sale state transitions.
//!
//! Every transition validates all of its preconditions before touching any
//! field, so a rejected call leaves the sale exactly as it found it. Token and
//! lamport movements are left to the instruction handlers and happen after
//! the accounting here has been committed.

use anchor_lang::prelude::*;
use crate::access_control::*;
use crate::account::*;
use crate::error::ErrorCode;
use crate::signature;

/// Token base units the lamport price is quoted for.
pub const PRICE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Where the unsold tokens go when the owner settles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeftoverDestination {
    Owner(u64),
    Burn(u64),
    Nothing,
}

/// Burning always transfers, even a zero leftover; otherwise nothing moves
/// unless some tokens remain.
pub fn leftover_destination(leftover: u64, with_burn: bool) -> LeftoverDestination {
    match (with_burn, leftover) {
        (true, amount) => LeftoverDestination::Burn(amount),
        (false, 0) => LeftoverDestination::Nothing,
        (false, amount) => LeftoverDestination::Owner(amount),
    }
}

/// Tokens bought for `payment` lamports, rounded down.
pub fn tokens_for_payment(payment: u64, token_price: u64) -> Result<u64> {
    let tokens = u128::from(payment)
        .checked_mul(PRICE_SCALE)
        .ok_or(ErrorCode::MathOverflow)?
        .checked_div(u128::from(token_price))
        .ok_or(ErrorCode::InvalidPrice)?;

    u64::try_from(tokens).map_err(|_| error!(ErrorCode::MathOverflow))
}

impl Sale {
    pub fn configure(&mut self, params: &SaleParams, now: i64) -> Result<()> {
        require!(params.token_price > 0, ErrorCode::InvalidPrice);
        require!(params.amount_of_tokens_to_sell > 0, ErrorCode::InvalidAmount);
        require!(params.sale_end > now, ErrorCode::InvalidTime);
        require!(params.tokens_unlock_time > now, ErrorCode::InvalidTime);

        self.sale_owner = params.sale_owner;
        self.token_price = params.token_price;
        self.amount_of_tokens_to_sell = params.amount_of_tokens_to_sell;
        self.sale_end = params.sale_end;
        self.tokens_unlock_time = params.tokens_unlock_time;
        Ok(())
    }

    pub fn set_registration_time(&mut self, starts: i64, ends: i64, now: i64) -> Result<()> {
        require!(!self.registration.is_set(), ErrorCode::RegistrationAlreadySet);
        require!(starts >= now && ends > starts, ErrorCode::InvalidTime);
        require!(ends < self.sale_end, ErrorCode::InvalidTime);
        if let Some(sale_start) = self.first_round_start() {
            require!(ends < sale_start, ErrorCode::InvalidTime);
        }

        self.registration.registration_time_starts = starts;
        self.registration.registration_time_ends = ends;
        Ok(())
    }

    pub fn set_rounds(&mut self, start_times: &[i64], max_participations: &[u64], now: i64) -> Result<()> {
        require!(self.rounds.is_empty(), ErrorCode::RoundsAlreadySet);
        require!(start_times.len() == max_participations.len(), ErrorCode::LengthMismatch);
        require!(!start_times.is_empty(), ErrorCode::RoundsNotSet);
        require!(start_times.len() <= MAX_ROUNDS, ErrorCode::TooManyRounds);

        require!(
            start_times[0] > self.registration.registration_time_ends,
            ErrorCode::InvalidRoundStart
        );
        require!(
            start_times.windows(2).all(|pair| pair[0] < pair[1]),
            ErrorCode::InvalidRoundStart
        );
        require!(
            start_times.iter().all(|start| *start >= now && *start < self.sale_end),
            ErrorCode::InvalidRoundStart
        );
        require!(
            max_participations.iter().all(|cap| *cap > 0),
            ErrorCode::InvalidMaxParticipation
        );

        self.rounds = start_times
            .iter()
            .zip(max_participations)
            .enumerate()
            .map(|(i, (start_time, max_participation))| Round {
                round_id: i as u8 + 1,
                start_time: *start_time,
                max_participation: *max_participation,
            })
            .collect();
        Ok(())
    }

    pub fn set_token_price(&mut self, price: u64, now: i64) -> Result<()> {
        before_sale_start(self, now)?;
        require!(price > 0, ErrorCode::InvalidPrice);

        self.token_price = price;
        Ok(())
    }

    /// Moves every round forward by `time_to_shift`, keeping their spacing.
    pub fn postpone_sale(&mut self, time_to_shift: i64, now: i64) -> Result<()> {
        before_sale_start(self, now)?;
        require!(time_to_shift > 0, ErrorCode::InvalidTime);

        let shifted = self
            .rounds
            .iter()
            .map(|r| r.start_time.checked_add(time_to_shift))
            .collect::<Option<Vec<i64>>>()
            .ok_or(ErrorCode::MathOverflow)?;

        for (round, start_time) in self.rounds.iter_mut().zip(shifted) {
            round.start_time = start_time;
        }
        Ok(())
    }

    pub fn extend_registration_period(&mut self, time_to_add: i64, now: i64) -> Result<()> {
        before_sale_start(self, now)?;
        require!(self.registration.is_set() && time_to_add > 0, ErrorCode::InvalidTime);

        let ends = self
            .registration
            .registration_time_ends
            .checked_add(time_to_add)
            .ok_or(ErrorCode::MathOverflow)?;
        let sale_start = self.first_round_start().ok_or(ErrorCode::RoundsNotSet)?;
        require!(ends < sale_start, ErrorCode::InvalidTime);

        self.registration.registration_time_ends = ends;
        Ok(())
    }

    /// The freeze is checked against the first round named in `round_ids`,
    /// not against the sale's first round.
    pub fn set_caps_per_round(&mut self, round_ids: &[u8], caps: &[u64], now: i64) -> Result<()> {
        require!(round_ids.len() == caps.len(), ErrorCode::LengthMismatch);

        let first = round_ids
            .first()
            .and_then(|id| self.round(*id))
            .ok_or(ErrorCode::InvalidRoundId)?;
        require!(now < first.start_time, ErrorCode::SaleAlreadyStarted);

        require!(
            round_ids.iter().all(|id| self.round(*id).is_some()),
            ErrorCode::InvalidRoundId
        );
        require!(caps.iter().all(|cap| *cap > 0), ErrorCode::InvalidMaxParticipation);

        for (round_id, cap) in round_ids.iter().zip(caps) {
            if let Some(round) = self.round_mut(*round_id) {
                round.max_participation = *cap;
            }
        }
        Ok(())
    }

    /// Amount to move into custody; only valid once, before the sale starts.
    pub fn deposit_amount(&self, custody_balance: u64, now: i64) -> Result<u64> {
        before_sale_start(self, now)?;
        require!(
            self.total_tokens_sold == 0 && custody_balance == 0,
            ErrorCode::TokensAlreadyDeposited
        );
        Ok(self.amount_of_tokens_to_sell)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn register<O: AdminOracle + ?Sized>(
        &mut self,
        participant: &mut Participant,
        oracle: &O,
        user: &Pubkey,
        sale_key: &Pubkey,
        round_id: u8,
        signature: &[u8],
        now: i64,
    ) -> Result<()> {
        require!(round_id != 0, ErrorCode::InvalidRoundId);
        registration_open(self, now)?;

        let message = signature::registration_message(user, round_id, sale_key);
        require!(signature::verify(oracle, &message, signature), ErrorCode::InvalidSignature);
        require!(participant.registered_round == 0, ErrorCode::AlreadyRegistered);

        let registrants = self
            .registration
            .number_of_registrants
            .checked_add(1)
            .ok_or(ErrorCode::MathOverflow)?;

        self.registration.number_of_registrants = registrants;
        participant.registered_round = round_id;
        Ok(())
    }

    /// Records a purchase and returns the number of tokens bought.
    ///
    /// `max_allowed_amount` is the signed ceiling for this buyer; it must fit
    /// the round cap and the derived purchase must fit it.
    #[allow(clippy::too_many_arguments)]
    pub fn participate<O: AdminOracle + ?Sized>(
        &mut self,
        participant: &mut Participant,
        oracle: &O,
        user: &Pubkey,
        signature: &[u8],
        max_allowed_amount: u64,
        round_id: u8,
        payment: u64,
        now: i64,
    ) -> Result<u64> {
        require!(round_id != 0, ErrorCode::InvalidRoundId);
        let round = self.round(round_id).ok_or(ErrorCode::InvalidRoundId)?;
        require!(max_allowed_amount <= round.max_participation, ErrorCode::ExceedsRoundCap);

        let message = signature::participation_message(user, max_allowed_amount, round_id);
        require!(signature::verify(oracle, &message, signature), ErrorCode::InvalidSignature);
        require!(!participant.has_participated, ErrorCode::AlreadyParticipated);
        require!(self.current_round(now) == round_id, ErrorCode::RoundNotActive);

        let tokens_bought = tokens_for_payment(payment, self.token_price)?;
        require!(tokens_bought <= max_allowed_amount, ErrorCode::ExceedsAllowedAmount);

        let total_tokens_sold = self
            .total_tokens_sold
            .checked_add(tokens_bought)
            .ok_or(ErrorCode::MathOverflow)?;
        require!(
            total_tokens_sold <= self.amount_of_tokens_to_sell,
            ErrorCode::ExceedsSaleCapacity
        );
        let total_lamports_raised = self
            .total_lamports_raised
            .checked_add(payment)
            .ok_or(ErrorCode::MathOverflow)?;

        self.total_tokens_sold = total_tokens_sold;
        self.total_lamports_raised = total_lamports_raised;
        participant.participation = Participation {
            amount: tokens_bought,
            timestamp: now,
            round_id,
            is_withdrawn: false,
        };
        participant.has_participated = true;
        Ok(tokens_bought)
    }

    /// Closes the books for the owner and returns the unsold token amount.
    pub fn withdraw_earnings_and_leftover(&mut self, now: i64) -> Result<u64> {
        sale_ended(self, now)?;
        require!(!self.earnings_withdrawn, ErrorCode::EarningsAlreadyWithdrawn);

        let leftover = self
            .amount_of_tokens_to_sell
            .checked_sub(self.total_tokens_sold)
            .ok_or(ErrorCode::MathOverflow)?;

        self.earnings_withdrawn = true;
        Ok(leftover)
    }
}

impl Participant {
    /// Marks the purchase withdrawn and returns the amount owed to the buyer.
    pub fn withdraw_tokens(&mut self, sale: &Sale, now: i64) -> Result<u64> {
        tokens_unlocked(sale, now)?;
        require!(self.has_participated, ErrorCode::NothingToWithdraw);
        require!(!self.participation.is_withdrawn, ErrorCode::AlreadyWithdrawn);

        self.participation.is_withdrawn = true;
        Ok(self.participation.amount)
    }
}
