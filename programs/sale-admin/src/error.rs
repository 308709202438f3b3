use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Registry authority is invalid")]
    InvalidAuthority,
    #[msg("Address is already an admin")]
    AdminAlreadyExists,
    #[msg("Address is not an admin")]
    AdminNotFound,
    #[msg("Admin list is full")]
    TooManyAdmins,
    #[msg("Cannot remove the last admin")]
    LastAdmin,
    #[msg("Signer is already registered")]
    SignerAlreadyExists,
    #[msg("Signer is not registered")]
    SignerNotFound,
    #[msg("Signer list is full")]
    TooManySigners,
}
