mod account; pub use account::*;
mod error; pub use error::ErrorCode;

use anchor_lang::prelude::*;

declare_id!("4X8i1cyYbexG7n9yyWb481VkFdBLP36NcfzGLTvH1yH8");

pub const ADMIN_REGISTRY_SEED: &[u8] = b"admin_registry";

#[program]
pub mod sale_admin {
    use super::*;

    pub fn initialize(ctx: Context<InitializeRegistry>) -> Result<()> {
        let authority = ctx.accounts.authority.key();
        let admin_registry = &mut ctx.accounts.admin_registry;

        admin_registry.authority = authority;
        admin_registry.bump = ctx.bumps.admin_registry;
        admin_registry.add_admin(authority)?;

        msg!("admin registry initialized, authority {}", authority);
        Ok(())
    }

    pub fn add_admin(ctx: Context<UpdateRegistry>, admin: Pubkey) -> Result<()> {
        ctx.accounts.admin_registry.add_admin(admin)?;
        msg!("admin added: {}", admin);
        Ok(())
    }

    pub fn remove_admin(ctx: Context<UpdateRegistry>, admin: Pubkey) -> Result<()> {
        ctx.accounts.admin_registry.remove_admin(&admin)?;
        msg!("admin removed: {}", admin);
        Ok(())
    }

    pub fn add_signer(ctx: Context<UpdateRegistry>, signer: [u8; 20]) -> Result<()> {
        ctx.accounts.admin_registry.add_signer(signer)?;
        msg!("signer added: {:?}", signer);
        Ok(())
    }

    pub fn remove_signer(ctx: Context<UpdateRegistry>, signer: [u8; 20]) -> Result<()> {
        ctx.accounts.admin_registry.remove_signer(&signer)?;
        msg!("signer removed: {:?}", signer);
        Ok(())
    }
}

#[derive(Accounts)]
pub struct InitializeRegistry<'info> {
    #[account(
        init,
        payer = authority,
        space = 8 + AdminRegistry::SPACE,
        seeds = [ADMIN_REGISTRY_SEED],
        bump
    )]
    pub admin_registry: Account<'info, AdminRegistry>,
    #[account(mut)]
    pub authority: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct UpdateRegistry<'info> {
    #[account(
        mut,
        seeds = [ADMIN_REGISTRY_SEED],
        bump = admin_registry.bump,
        has_one = authority @ ErrorCode::InvalidAuthority
    )]
    pub admin_registry: Account<'info, AdminRegistry>,
    pub authority: Signer<'info>,
}
