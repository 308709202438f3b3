use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::token::{self, Transfer};
use crate::account::{Participant, Participation};
use crate::error::ErrorCode;

pub fn send_lamports<'info>(
    from: AccountInfo<'info>,
    to: AccountInfo<'info>,
    system_program: AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    system_program::transfer(
        CpiContext::new(system_program, system_program::Transfer { from, to }),
        amount,
    )
}

/// Moves everything above the rent-exempt minimum out of a program-owned
/// vault and returns the amount moved.
pub fn drain_vault(vault: &AccountInfo, to: &AccountInfo, rent: &Rent) -> Result<u64> {
    let minimum_balance = rent.minimum_balance(vault.try_data_len()?);
    let vault_lamports = vault.lamports();
    let available_lamports = vault_lamports.saturating_sub(minimum_balance);
    if available_lamports == 0 {
        return Ok(0);
    }

    let receiver_lamports = to
        .lamports()
        .checked_add(available_lamports)
        .ok_or(ErrorCode::MathOverflow)?;

    **vault.try_borrow_mut_lamports()? = vault_lamports - available_lamports;
    **to.try_borrow_mut_lamports()? = receiver_lamports;

    Ok(available_lamports)
}

/// SPL transfer out of an account whose authority is a PDA of this program.
pub fn transfer_tokens<'info>(
    token_program: AccountInfo<'info>,
    from: AccountInfo<'info>,
    to: AccountInfo<'info>,
    authority: AccountInfo<'info>,
    signer_seeds: &[&[&[u8]]],
    amount: u64,
) -> Result<()> {
    token::transfer(
        CpiContext::new_with_signer(
            token_program,
            Transfer { from, to, authority },
            signer_seeds,
        ),
        amount,
    )
}

/// Purchase recorded in a participant entry; zeroed when the entry was never
/// created or is not owned by this program.
pub fn read_participation(info: &AccountInfo) -> Result<Participation> {
    if info.owner != &crate::ID || info.data_is_empty() {
        return Ok(Participation::default());
    }

    let participant = Participant::try_deserialize(&mut &info.try_borrow_data()?[..])?;
    Ok(participant.participation)
}
