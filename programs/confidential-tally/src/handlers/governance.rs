use anchor_lang::prelude::*;

use crate::{constants::REGISTRY_SEED, state::Registry};

/// Accounts shared by every owner-only registry instruction. The registry
/// methods reject callers other than the owner.
#[derive(Accounts)]
pub struct Govern<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
    )]
    pub registry: Account<'info, Registry>,
}

pub fn transfer_ownership(ctx: Context<Govern>, new_owner: Pubkey) -> Result<()> {
    let caller = ctx.accounts.authority.key();
    let event = ctx.accounts.registry.transfer_ownership(&caller, new_owner)?;

    msg!("Ownership transferred from {} to {}", caller, new_owner);
    emit!(event);

    Ok(())
}

pub fn add_provider(ctx: Context<Govern>, provider: Pubkey) -> Result<()> {
    let caller = ctx.accounts.authority.key();

    match ctx.accounts.registry.add_provider(&caller, provider)? {
        Some(event) => {
            msg!("Provider {} added", provider);
            emit!(event);
        }
        None => msg!("Provider {} already registered", provider),
    }

    Ok(())
}

pub fn remove_provider(ctx: Context<Govern>, provider: Pubkey) -> Result<()> {
    let caller = ctx.accounts.authority.key();

    match ctx.accounts.registry.remove_provider(&caller, provider)? {
        Some(event) => {
            msg!("Provider {} removed", provider);
            emit!(event);
        }
        None => msg!("Provider {} was not registered", provider),
    }

    Ok(())
}

pub fn pause(ctx: Context<Govern>) -> Result<()> {
    let caller = ctx.accounts.authority.key();
    let event = ctx.accounts.registry.pause(&caller)?;

    msg!("Paused");
    emit!(event);

    Ok(())
}

pub fn unpause(ctx: Context<Govern>) -> Result<()> {
    let caller = ctx.accounts.authority.key();
    let event = ctx.accounts.registry.unpause(&caller)?;

    msg!("Unpaused");
    emit!(event);

    Ok(())
}

pub fn set_cooldown(ctx: Context<Govern>, seconds: i64) -> Result<()> {
    let caller = ctx.accounts.authority.key();
    let event = ctx.accounts.registry.set_cooldown(&caller, seconds)?;

    msg!("Cooldown set to {}s", seconds);
    emit!(event);

    Ok(())
}

pub fn set_kms_signer(ctx: Context<Govern>, signer: Pubkey) -> Result<()> {
    let caller = ctx.accounts.authority.key();
    let event = ctx.accounts.registry.set_kms_signer(&caller, signer)?;

    msg!("KMS signer set to {}", signer);
    emit!(event);

    Ok(())
}
