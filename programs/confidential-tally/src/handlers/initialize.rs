use anchor_lang::prelude::*;

use crate::{
    constants::{BATCH_SEED, FIRST_BATCH_ID, REGISTRY_SEED},
    state::{Batch, BatchOpened, ProviderAdded, Registry},
};

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        init,
        payer = owner,
        space = 8 + Registry::INIT_SPACE,
        seeds = [REGISTRY_SEED],
        bump,
    )]
    pub registry: Account<'info, Registry>,

    #[account(
        init,
        payer = owner,
        space = 8 + Batch::INIT_SPACE,
        seeds = [BATCH_SEED, FIRST_BATCH_ID.to_le_bytes().as_ref()],
        bump,
    )]
    pub first_batch: Account<'info, Batch>,

    pub system_program: Program<'info, System>,
}

/// Sets up the registry with the caller as owner and sole provider, and
/// opens the first batch.
///
/// # Arguments
/// * `cooldown_seconds` - Minimum spacing between gated actions of one actor
/// * `kms_signer` - Ed25519 identity whose signatures prove decryption results
pub fn initialize(ctx: Context<Initialize>, cooldown_seconds: i64, kms_signer: Pubkey) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let owner = ctx.accounts.owner.key();

    msg!("Initializing registry owned by {}", owner);

    let (provider_added, batch_opened) = process_initialize(
        &mut ctx.accounts.registry,
        &mut ctx.accounts.first_batch,
        owner,
        cooldown_seconds,
        kms_signer,
        (ctx.bumps.registry, ctx.bumps.first_batch),
        now,
    )?;

    emit!(provider_added);
    emit!(batch_opened);

    Ok(())
}

pub fn process_initialize(
    registry: &mut Registry,
    first_batch: &mut Batch,
    owner: Pubkey,
    cooldown_seconds: i64,
    kms_signer: Pubkey,
    (registry_bump, batch_bump): (u8, u8),
    now: i64,
) -> Result<(ProviderAdded, BatchOpened)> {
    let provider_added = registry.initialize(owner, cooldown_seconds, kms_signer, registry_bump)?;
    let batch_opened = first_batch.open(FIRST_BATCH_ID, now, batch_bump);
    Ok((provider_added, batch_opened))
}
