mod account; pub use account::*;
mod error; pub use error::ErrorCode;
mod access_control; use access_control::*;
mod events; pub use events::*;
mod helper; use helper::*;
mod sale; use sale::{leftover_destination, LeftoverDestination};
pub mod signature;
#[cfg(test)]
mod testing;

use {
    anchor_lang::prelude::*,
    anchor_spl::token::{Mint, Token, TokenAccount},
    sale_admin::{AdminRegistry, ADMIN_REGISTRY_SEED},
    solana_program::incinerator,
};

declare_id!("AJLPeVN4MYaUDV9qpL1yU7QC3G4aDvWhdNDNkwSK6Nsg");

pub const SALE_SEED: &[u8] = b"sale";
pub const VAULT_SEED: &[u8] = b"vault";
pub const CUSTODY_SEED: &[u8] = b"custody";
pub const PARTICIPANT_SEED: &[u8] = b"participant";

#[program]
pub mod whitelist_sale {
    use super::*;

    #[access_control(only_admin(&*ctx.accounts.admin_registry, ctx.accounts.admin.key))]
    pub fn initialize_sale(ctx: Context<InitializeSale>, params: SaleParams) -> Result<()> {
        let now = ctx.accounts.clock.unix_timestamp;
        let sale_key = ctx.accounts.sale.key();
        let sale = &mut ctx.accounts.sale;

        sale.configure(&params, now)?;
        sale.admin_registry = ctx.accounts.admin_registry.key();
        sale.token_mint = ctx.accounts.token_mint.key();
        sale.bump = ctx.bumps.sale;
        sale.vault_bump = ctx.bumps.sale_vault;
        sale.custody_bump = ctx.bumps.custody;

        emit!(SaleCreated {
            sale: sale_key,
            sale_owner: sale.sale_owner,
            token_price: sale.token_price,
            amount_of_tokens_to_sell: sale.amount_of_tokens_to_sell,
            sale_end: sale.sale_end,
            tokens_unlock_time: sale.tokens_unlock_time,
        });
        msg!("sale {} created for mint {}", sale_key, sale.token_mint);
        Ok(())
    }

    #[access_control(only_admin(&*ctx.accounts.admin_registry, ctx.accounts.admin.key))]
    pub fn set_registration_time(
        ctx: Context<ConfigureSale>,
        registration_time_starts: i64,
        registration_time_ends: i64,
    ) -> Result<()> {
        let now = ctx.accounts.clock.unix_timestamp;
        ctx.accounts
            .sale
            .set_registration_time(registration_time_starts, registration_time_ends, now)?;

        emit!(RegistrationTimeSet { registration_time_starts, registration_time_ends });
        Ok(())
    }

    #[access_control(only_admin(&*ctx.accounts.admin_registry, ctx.accounts.admin.key))]
    pub fn set_rounds(
        ctx: Context<ConfigureSale>,
        start_times: Vec<i64>,
        max_participations: Vec<u64>,
    ) -> Result<()> {
        let now = ctx.accounts.clock.unix_timestamp;
        let sale = &mut ctx.accounts.sale;
        sale.set_rounds(&start_times, &max_participations, now)?;

        for round in sale.rounds.iter() {
            emit!(RoundAdded {
                round_id: round.round_id,
                start_time: round.start_time,
                max_participation: round.max_participation,
            });
        }
        Ok(())
    }

    #[access_control(only_admin(&*ctx.accounts.admin_registry, ctx.accounts.admin.key))]
    pub fn set_token_price(ctx: Context<ConfigureSale>, price: u64) -> Result<()> {
        let now = ctx.accounts.clock.unix_timestamp;
        ctx.accounts.sale.set_token_price(price, now)?;

        emit!(TokenPriceSet { new_price: price });
        msg!("token price set to {}", price);
        Ok(())
    }

    #[access_control(only_admin(&*ctx.accounts.admin_registry, ctx.accounts.admin.key))]
    pub fn postpone_sale(ctx: Context<ConfigureSale>, time_to_shift: i64) -> Result<()> {
        let now = ctx.accounts.clock.unix_timestamp;
        let sale = &mut ctx.accounts.sale;
        sale.postpone_sale(time_to_shift, now)?;

        let first_round_start = sale.first_round_start().unwrap_or_default();
        emit!(SalePostponed { time_shifted: time_to_shift, first_round_start });
        msg!("sale postponed by {}s, starts at {}", time_to_shift, first_round_start);
        Ok(())
    }

    #[access_control(only_admin(&*ctx.accounts.admin_registry, ctx.accounts.admin.key))]
    pub fn extend_registration_period(ctx: Context<ConfigureSale>, time_to_add: i64) -> Result<()> {
        let now = ctx.accounts.clock.unix_timestamp;
        let sale = &mut ctx.accounts.sale;
        sale.extend_registration_period(time_to_add, now)?;

        emit!(RegistrationPeriodExtended {
            registration_time_ends: sale.registration.registration_time_ends,
        });
        Ok(())
    }

    #[access_control(only_admin(&*ctx.accounts.admin_registry, ctx.accounts.admin.key))]
    pub fn set_caps_per_round(
        ctx: Context<ConfigureSale>,
        round_ids: Vec<u8>,
        caps: Vec<u64>,
    ) -> Result<()> {
        let now = ctx.accounts.clock.unix_timestamp;
        ctx.accounts.sale.set_caps_per_round(&round_ids, &caps, now)?;

        for (round_id, max_participation) in round_ids.into_iter().zip(caps) {
            emit!(MaxParticipationSet { round_id, max_participation });
        }
        Ok(())
    }

    pub fn deposit_tokens(ctx: Context<DepositTokens>) -> Result<()> {
        let now = ctx.accounts.clock.unix_timestamp;
        let amount = ctx.accounts.sale.deposit_amount(ctx.accounts.custody.amount, now)?;

        transfer_tokens(
            ctx.accounts.token_program.to_account_info(),
            ctx.accounts.owner_token_account.to_account_info(),
            ctx.accounts.custody.to_account_info(),
            ctx.accounts.sale_owner.to_account_info(),
            &[],
            amount,
        )?;

        emit!(TokensDeposited { depositor: ctx.accounts.sale_owner.key(), amount });
        msg!("{} tokens deposited", amount);
        Ok(())
    }

    pub fn register(ctx: Context<Register>, signature: Vec<u8>, round_id: u8) -> Result<()> {
        let now = ctx.accounts.clock.unix_timestamp;
        let sale_key = ctx.accounts.sale.key();
        let user = ctx.accounts.user.key();

        let participant = &mut ctx.accounts.participant;
        participant.bind(user, ctx.bumps.participant);

        ctx.accounts.sale.register(
            participant,
            &*ctx.accounts.admin_registry,
            &user,
            &sale_key,
            round_id,
            &signature,
            now,
        )?;

        emit!(UserRegistered { user, round_id });
        msg!("{} registered for round {}", user, round_id);
        Ok(())
    }

    #[access_control(direct_caller())]
    pub fn participate(
        ctx: Context<Participate>,
        signature: Vec<u8>,
        max_allowed_amount: u64,
        round_id: u8,
        payment: u64,
    ) -> Result<()> {
        let now = ctx.accounts.clock.unix_timestamp;
        let user = ctx.accounts.user.key();

        let participant = &mut ctx.accounts.participant;
        participant.bind(user, ctx.bumps.participant);

        let amount = ctx.accounts.sale.participate(
            participant,
            &*ctx.accounts.admin_registry,
            &user,
            &signature,
            max_allowed_amount,
            round_id,
            payment,
            now,
        )?;

        send_lamports(
            ctx.accounts.user.to_account_info(),
            ctx.accounts.sale_vault.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
            payment,
        )?;

        emit!(TokensSold { user, amount, round_id });
        msg!("{} bought {} tokens in round {} for {} lamports", user, amount, round_id, payment);
        Ok(())
    }

    pub fn withdraw_tokens(ctx: Context<WithdrawTokens>) -> Result<()> {
        let now = ctx.accounts.clock.unix_timestamp;
        let amount = ctx.accounts.participant.withdraw_tokens(&ctx.accounts.sale, now)?;

        let token_mint = ctx.accounts.sale.token_mint;
        let seeds = &[SALE_SEED, token_mint.as_ref(), &[ctx.accounts.sale.bump]];
        let signer = [&seeds[..]];

        transfer_tokens(
            ctx.accounts.token_program.to_account_info(),
            ctx.accounts.custody.to_account_info(),
            ctx.accounts.user_token_account.to_account_info(),
            ctx.accounts.sale.to_account_info(),
            &signer,
            amount,
        )?;

        emit!(TokensWithdrawn { user: ctx.accounts.user.key(), amount });
        Ok(())
    }

    pub fn withdraw_earnings_and_leftover(
        ctx: Context<WithdrawEarningsAndLeftover>,
        with_burn: bool,
    ) -> Result<()> {
        let now = ctx.accounts.clock.unix_timestamp;
        let leftover = ctx.accounts.sale.withdraw_earnings_and_leftover(now)?;
        let token_mint = ctx.accounts.sale.token_mint;

        let destination = match leftover_destination(leftover, with_burn) {
            LeftoverDestination::Burn(_) => {
                let burn_account = ctx
                    .accounts
                    .burn_token_account
                    .as_ref()
                    .ok_or(ErrorCode::MissingBurnAccount)?;
                require!(
                    burn_account.owner == incinerator::ID && burn_account.mint == token_mint,
                    ErrorCode::InvalidBurnAccount
                );
                Some(burn_account.to_account_info())
            }
            LeftoverDestination::Owner(_) => {
                let owner_account = ctx
                    .accounts
                    .owner_token_account
                    .as_ref()
                    .ok_or(ErrorCode::MissingTokenAccount)?;
                require!(owner_account.mint == token_mint, ErrorCode::InvalidTokenAccount);
                Some(owner_account.to_account_info())
            }
            LeftoverDestination::Nothing => None,
        };

        if let Some(to) = destination {
            let seeds = &[SALE_SEED, token_mint.as_ref(), &[ctx.accounts.sale.bump]];
            let signer = [&seeds[..]];

            transfer_tokens(
                ctx.accounts.token_program.to_account_info(),
                ctx.accounts.custody.to_account_info(),
                to,
                ctx.accounts.sale.to_account_info(),
                &signer,
                leftover,
            )?;
        }

        let earnings = drain_vault(
            &ctx.accounts.sale_vault.to_account_info(),
            &ctx.accounts.sale_owner.to_account_info(),
            &ctx.accounts.rent,
        )?;

        let sale_owner = ctx.accounts.sale_owner.key();
        emit!(EarningsWithdrawn { sale_owner, amount: earnings });
        if with_burn {
            emit!(LeftoverBurned { amount: leftover });
        } else {
            emit!(LeftoverWithdrawn { sale_owner, amount: leftover });
        }
        msg!("sale settled: {} lamports, {} tokens left over", earnings, leftover);
        Ok(())
    }

    pub fn get_current_round(ctx: Context<SaleView>) -> Result<u8> {
        Ok(ctx.accounts.sale.current_round(ctx.accounts.clock.unix_timestamp))
    }

    pub fn get_registration_info(ctx: Context<SaleView>) -> Result<RegistrationInfo> {
        Ok(ctx.accounts.sale.registration_info())
    }

    pub fn get_number_of_registered_users(ctx: Context<SaleView>) -> Result<u64> {
        Ok(ctx.accounts.sale.registration.number_of_registrants)
    }

    pub fn get_participation(ctx: Context<ParticipationView>, _user: Pubkey) -> Result<Participation> {
        read_participation(&ctx.accounts.participant.to_account_info())
    }
}

#[derive(Accounts)]
pub struct InitializeSale<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + Sale::SPACE,
        seeds = [SALE_SEED, token_mint.key().as_ref()],
        bump
    )]
    pub sale: Account<'info, Sale>,
    #[account(
        init,
        payer = admin,
        space = 8,
        seeds = [VAULT_SEED, sale.key().as_ref()],
        bump
    )]
    pub sale_vault: Account<'info, SaleVault>,
    #[account(
        init,
        payer = admin,
        seeds = [CUSTODY_SEED, sale.key().as_ref()],
        bump,
        token::mint = token_mint,
        token::authority = sale,
    )]
    pub custody: Account<'info, TokenAccount>,
    pub token_mint: Account<'info, Mint>,
    #[account(
        seeds = [ADMIN_REGISTRY_SEED],
        bump = admin_registry.bump,
        seeds::program = sale_admin::ID,
    )]
    pub admin_registry: Account<'info, AdminRegistry>,
    #[account(mut)]
    pub admin: Signer<'info>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
    pub clock: Sysvar<'info, Clock>,
}

#[derive(Accounts)]
pub struct ConfigureSale<'info> {
    #[account(
        mut,
        seeds = [SALE_SEED, sale.token_mint.as_ref()],
        bump = sale.bump,
    )]
    pub sale: Account<'info, Sale>,
    #[account(
        address = sale.admin_registry
        @ ErrorCode::InvalidAdminRegistry
    )]
    pub admin_registry: Account<'info, AdminRegistry>,
    pub admin: Signer<'info>,
    pub clock: Sysvar<'info, Clock>,
}

#[derive(Accounts)]
pub struct DepositTokens<'info> {
    #[account(
        seeds = [SALE_SEED, sale.token_mint.as_ref()],
        bump = sale.bump,
    )]
    pub sale: Account<'info, Sale>,
    #[account(
        mut,
        seeds = [CUSTODY_SEED, sale.key().as_ref()],
        bump = sale.custody_bump,
    )]
    pub custody: Account<'info, TokenAccount>,
    #[account(
        mut,
        constraint = owner_token_account.mint == sale.token_mint
        @ ErrorCode::InvalidTokenAccount
    )]
    pub owner_token_account: Account<'info, TokenAccount>,
    #[account(
        constraint = sale_owner.key() == sale.sale_owner
        @ ErrorCode::NotSaleOwner
    )]
    pub sale_owner: Signer<'info>,
    pub token_program: Program<'info, Token>,
    pub clock: Sysvar<'info, Clock>,
}

#[derive(Accounts)]
pub struct Register<'info> {
    #[account(
        mut,
        seeds = [SALE_SEED, sale.token_mint.as_ref()],
        bump = sale.bump,
    )]
    pub sale: Account<'info, Sale>,
    #[account(
        address = sale.admin_registry
        @ ErrorCode::InvalidAdminRegistry
    )]
    pub admin_registry: Account<'info, AdminRegistry>,
    #[account(
        init_if_needed,
        payer = user,
        space = 8 + Participant::SPACE,
        seeds = [PARTICIPANT_SEED, sale.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub participant: Account<'info, Participant>,
    #[account(mut)]
    pub user: Signer<'info>,
    pub system_program: Program<'info, System>,
    pub clock: Sysvar<'info, Clock>,
}

#[derive(Accounts)]
pub struct Participate<'info> {
    #[account(
        mut,
        seeds = [SALE_SEED, sale.token_mint.as_ref()],
        bump = sale.bump,
    )]
    pub sale: Account<'info, Sale>,
    #[account(
        address = sale.admin_registry
        @ ErrorCode::InvalidAdminRegistry
    )]
    pub admin_registry: Account<'info, AdminRegistry>,
    #[account(
        init_if_needed,
        payer = user,
        space = 8 + Participant::SPACE,
        seeds = [PARTICIPANT_SEED, sale.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub participant: Account<'info, Participant>,
    #[account(
        mut,
        seeds = [VAULT_SEED, sale.key().as_ref()],
        bump = sale.vault_bump,
    )]
    pub sale_vault: Account<'info, SaleVault>,
    #[account(mut)]
    pub user: Signer<'info>,
    pub system_program: Program<'info, System>,
    pub clock: Sysvar<'info, Clock>,
}

#[derive(Accounts)]
pub struct WithdrawTokens<'info> {
    #[account(
        seeds = [SALE_SEED, sale.token_mint.as_ref()],
        bump = sale.bump,
    )]
    pub sale: Account<'info, Sale>,
    #[account(
        mut,
        seeds = [PARTICIPANT_SEED, sale.key().as_ref(), user.key().as_ref()],
        bump = participant.bump,
    )]
    pub participant: Account<'info, Participant>,
    #[account(
        mut,
        seeds = [CUSTODY_SEED, sale.key().as_ref()],
        bump = sale.custody_bump,
    )]
    pub custody: Account<'info, TokenAccount>,
    #[account(
        mut,
        constraint = user_token_account.mint == sale.token_mint
        @ ErrorCode::InvalidTokenAccount
    )]
    pub user_token_account: Account<'info, TokenAccount>,
    pub user: Signer<'info>,
    pub token_program: Program<'info, Token>,
    pub clock: Sysvar<'info, Clock>,
}

#[derive(Accounts)]
pub struct WithdrawEarningsAndLeftover<'info> {
    #[account(
        mut,
        seeds = [SALE_SEED, sale.token_mint.as_ref()],
        bump = sale.bump,
    )]
    pub sale: Account<'info, Sale>,
    #[account(
        mut,
        seeds = [VAULT_SEED, sale.key().as_ref()],
        bump = sale.vault_bump,
    )]
    pub sale_vault: Account<'info, SaleVault>,
    #[account(
        mut,
        seeds = [CUSTODY_SEED, sale.key().as_ref()],
        bump = sale.custody_bump,
    )]
    pub custody: Account<'info, TokenAccount>,
    #[account(mut)]
    pub owner_token_account: Option<Account<'info, TokenAccount>>,
    #[account(mut)]
    pub burn_token_account: Option<Account<'info, TokenAccount>>,
    #[account(
        mut,
        constraint = sale_owner.key() == sale.sale_owner
        @ ErrorCode::NotSaleOwner
    )]
    pub sale_owner: Signer<'info>,
    pub token_program: Program<'info, Token>,
    pub rent: Sysvar<'info, Rent>,
    pub clock: Sysvar<'info, Clock>,
}

#[derive(Accounts)]
pub struct SaleView<'info> {
    pub sale: Account<'info, Sale>,
    pub clock: Sysvar<'info, Clock>,
}

#[derive(Accounts)]
#[instruction(user: Pubkey)]
pub struct ParticipationView<'info> {
    pub sale: Account<'info, Sale>,
    /// CHECK: may not exist yet; read in the handler only when owned by this program
    #[account(
        seeds = [PARTICIPANT_SEED, sale.key().as_ref(), user.as_ref()],
        bump,
    )]
    pub participant: UncheckedAccount<'info>,
}
