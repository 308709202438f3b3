use anchor_lang::prelude::*;
use crate::error::ErrorCode;

pub const MAX_ADMINS: usize = 16;
pub const MAX_SIGNERS: usize = 16;

/// 20-byte secp256k1 signer address (keccak-256 of the public key, last 20 bytes).
pub type EthAddress = [u8; 20];

#[account]
pub struct AdminRegistry {
    pub authority: Pubkey,
    pub admins: Vec<Pubkey>,          // wallets allowed to call privileged sale instructions
    pub signers: Vec<[u8; 20]>,       // off-chain keys allowed to sign registrations and purchases
    pub bump: u8,
}

impl AdminRegistry {
    pub const SPACE: usize = 32 + (4 + 32 * MAX_ADMINS) + (4 + 20 * MAX_SIGNERS) + 1;

    pub fn is_admin(&self, who: &Pubkey) -> bool {
        self.admins.contains(who)
    }

    pub fn is_signer(&self, signer: &EthAddress) -> bool {
        self.signers.contains(signer)
    }

    pub fn add_admin(&mut self, admin: Pubkey) -> Result<()> {
        require!(!self.is_admin(&admin), ErrorCode::AdminAlreadyExists);
        require!(self.admins.len() < MAX_ADMINS, ErrorCode::TooManyAdmins);
        self.admins.push(admin);
        Ok(())
    }

    pub fn remove_admin(&mut self, admin: &Pubkey) -> Result<()> {
        let index = self
            .admins
            .iter()
            .position(|a| a == admin)
            .ok_or(ErrorCode::AdminNotFound)?;
        require!(self.admins.len() > 1, ErrorCode::LastAdmin);
        self.admins.remove(index);
        Ok(())
    }

    pub fn add_signer(&mut self, signer: EthAddress) -> Result<()> {
        require!(!self.is_signer(&signer), ErrorCode::SignerAlreadyExists);
        require!(self.signers.len() < MAX_SIGNERS, ErrorCode::TooManySigners);
        self.signers.push(signer);
        Ok(())
    }

    pub fn remove_signer(&mut self, signer: &EthAddress) -> Result<()> {
        let index = self
            .signers
            .iter()
            .position(|s| s == signer)
            .ok_or(ErrorCode::SignerNotFound)?;
        self.signers.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AdminRegistry {
        let authority = Pubkey::new_unique();
        AdminRegistry {
            authority,
            admins: vec![authority],
            signers: Vec::new(),
            bump: 255,
        }
    }

    #[test]
    fn admins_are_added_once() {
        let mut registry = registry();
        let admin = Pubkey::new_unique();

        registry.add_admin(admin).unwrap();
        assert!(registry.is_admin(&admin));
        assert_eq!(
            registry.add_admin(admin).unwrap_err(),
            ErrorCode::AdminAlreadyExists.into()
        );
        assert_eq!(registry.admins.len(), 2);
    }

    #[test]
    fn admin_list_is_bounded() {
        let mut registry = registry();
        for _ in 1..MAX_ADMINS {
            registry.add_admin(Pubkey::new_unique()).unwrap();
        }
        assert_eq!(
            registry.add_admin(Pubkey::new_unique()).unwrap_err(),
            ErrorCode::TooManyAdmins.into()
        );
    }

    #[test]
    fn last_admin_cannot_be_removed() {
        let mut registry = registry();
        let authority = registry.authority;

        assert_eq!(
            registry.remove_admin(&authority).unwrap_err(),
            ErrorCode::LastAdmin.into()
        );
        assert_eq!(
            registry.remove_admin(&Pubkey::new_unique()).unwrap_err(),
            ErrorCode::AdminNotFound.into()
        );

        let other = Pubkey::new_unique();
        registry.add_admin(other).unwrap();
        registry.remove_admin(&authority).unwrap();
        assert!(!registry.is_admin(&authority));
        assert!(registry.is_admin(&other));
    }

    #[test]
    fn signers_round_trip_through_the_list() {
        let mut registry = registry();
        let signer = [0xab; 20];

        assert!(!registry.is_signer(&signer));
        registry.add_signer(signer).unwrap();
        assert!(registry.is_signer(&signer));
        assert_eq!(
            registry.add_signer(signer).unwrap_err(),
            ErrorCode::SignerAlreadyExists.into()
        );

        registry.remove_signer(&signer).unwrap();
        assert!(!registry.is_signer(&signer));
        assert_eq!(
            registry.remove_signer(&signer).unwrap_err(),
            ErrorCode::SignerNotFound.into()
        );
    }
}
