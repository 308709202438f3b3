use anchor_lang::prelude::*;
use sale_admin::{AdminRegistry, EthAddress};
use solana_program::instruction::{get_stack_height, TRANSACTION_LEVEL_STACK_HEIGHT};
use crate::account::*;
use crate::error::ErrorCode;

/// Answers whether a wallet or an off-chain signing key belongs to an admin.
pub trait AdminOracle {
    fn is_admin(&self, who: &Pubkey) -> bool;
    fn is_admin_signer(&self, signer: &EthAddress) -> bool;
}

impl AdminOracle for AdminRegistry {
    fn is_admin(&self, who: &Pubkey) -> bool {
        AdminRegistry::is_admin(self, who)
    }

    fn is_admin_signer(&self, signer: &EthAddress) -> bool {
        self.is_signer(signer)
    }
}

pub fn only_admin<O: AdminOracle + ?Sized>(oracle: &O, who: &Pubkey) -> Result<()> {
    if !oracle.is_admin(who) {
        return err!(ErrorCode::NotAdmin);
    }
    Ok(())
}

/// Rejects instructions reached through CPI: only the transaction's own
/// top-level instruction may buy.
pub fn direct_caller() -> Result<()> {
    if get_stack_height() != TRANSACTION_LEVEL_STACK_HEIGHT {
        return err!(ErrorCode::NotDirectCaller);
    }
    Ok(())
}

pub fn before_sale_start(sale: &Sale, now: i64) -> Result<()> {
    let sale_start = sale.first_round_start().ok_or(ErrorCode::RoundsNotSet)?;

    if now >= sale_start {
        return err!(ErrorCode::SaleAlreadyStarted);
    }
    Ok(())
}

pub fn registration_open(sale: &Sale, now: i64) -> Result<()> {
    if sale.registration.registration_time_starts > now {
        return err!(ErrorCode::RegistrationNotStarted);
    }

    if sale.registration.registration_time_ends < now {
        return err!(ErrorCode::RegistrationClosed);
    }
    Ok(())
}

pub fn tokens_unlocked(sale: &Sale, now: i64) -> Result<()> {
    if sale.tokens_unlock_time > now {
        return err!(ErrorCode::TokensLocked);
    }
    Ok(())
}

pub fn sale_ended(sale: &Sale, now: i64) -> Result<()> {
    if sale.sale_end > now {
        return err!(ErrorCode::SaleNotEnded);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sale_with_rounds, FakeOracle};

    #[test]
    fn only_admin_consults_the_oracle() {
        let admin = Pubkey::new_unique();
        let oracle = FakeOracle::with_admin(admin);

        assert!(only_admin(&oracle, &admin).is_ok());
        assert_eq!(
            only_admin(&oracle, &Pubkey::new_unique()).unwrap_err(),
            ErrorCode::NotAdmin.into()
        );
    }

    #[test]
    fn registry_answers_for_admins_and_signers() {
        let admin = Pubkey::new_unique();
        let registry = AdminRegistry {
            authority: admin,
            admins: vec![admin],
            signers: vec![[7; 20]],
            bump: 255,
        };

        assert!(AdminOracle::is_admin(&registry, &admin));
        assert!(!AdminOracle::is_admin(&registry, &Pubkey::new_unique()));
        assert!(registry.is_admin_signer(&[7; 20]));
        assert!(!registry.is_admin_signer(&[8; 20]));
    }

    #[test]
    fn sale_start_is_the_first_round() {
        let sale = sale_with_rounds(&[100, 200]);
        assert!(before_sale_start(&sale, 99).is_ok());
        assert_eq!(
            before_sale_start(&sale, 100).unwrap_err(),
            ErrorCode::SaleAlreadyStarted.into()
        );

        let unscheduled = sale_with_rounds(&[]);
        assert_eq!(
            before_sale_start(&unscheduled, 0).unwrap_err(),
            ErrorCode::RoundsNotSet.into()
        );
    }

    #[test]
    fn registration_window_is_inclusive() {
        let sale = sale_with_rounds(&[100]);
        let starts = sale.registration.registration_time_starts;
        let ends = sale.registration.registration_time_ends;

        assert_eq!(
            registration_open(&sale, starts - 1).unwrap_err(),
            ErrorCode::RegistrationNotStarted.into()
        );
        assert!(registration_open(&sale, starts).is_ok());
        assert!(registration_open(&sale, ends).is_ok());
        assert_eq!(
            registration_open(&sale, ends + 1).unwrap_err(),
            ErrorCode::RegistrationClosed.into()
        );
    }

    #[test]
    fn unlock_and_sale_end_are_inclusive() {
        let sale = sale_with_rounds(&[100]);

        assert_eq!(
            tokens_unlocked(&sale, sale.tokens_unlock_time - 1).unwrap_err(),
            ErrorCode::TokensLocked.into()
        );
        assert!(tokens_unlocked(&sale, sale.tokens_unlock_time).is_ok());

        assert_eq!(
            sale_ended(&sale, sale.sale_end - 1).unwrap_err(),
            ErrorCode::SaleNotEnded.into()
        );
        assert!(sale_ended(&sale, sale.sale_end).is_ok());
    }
}
