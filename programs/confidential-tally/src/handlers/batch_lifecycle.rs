use anchor_lang::prelude::*;

use crate::{
    constants::{BATCH_SEED, REGISTRY_SEED},
    state::{Batch, BatchClosed, BatchOpened, Registry},
};

#[derive(Accounts)]
pub struct OpenBatch<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
    )]
    pub registry: Account<'info, Registry>,

    #[account(
        init,
        payer = authority,
        space = 8 + Batch::INIT_SPACE,
        seeds = [BATCH_SEED, registry.current_batch_id.saturating_add(1).to_le_bytes().as_ref()],
        bump,
    )]
    pub batch: Account<'info, Batch>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(batch_id: u64)]
pub struct CloseBatch<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
    )]
    pub registry: Account<'info, Registry>,

    /// CHECK: batch PDA for `batch_id`, which may never have been created; read through `Batch::load`
    #[account(
        mut,
        seeds = [BATCH_SEED, batch_id.to_le_bytes().as_ref()],
        bump,
    )]
    pub batch: UncheckedAccount<'info>,
}

/// Opens the next batch. Earlier batches keep their state.
pub fn open_batch(ctx: Context<OpenBatch>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let caller = ctx.accounts.authority.key();

    let event = process_open_batch(
        &mut ctx.accounts.registry,
        &mut ctx.accounts.batch,
        &caller,
        ctx.bumps.batch,
        now,
    )?;

    msg!("Opened batch {}", event.batch_id);
    emit!(event);

    Ok(())
}

/// Closes an open batch for good. New votes need a new batch.
pub fn close_batch(ctx: Context<CloseBatch>, batch_id: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let caller = ctx.accounts.authority.key();
    let batch_info = ctx.accounts.batch.to_account_info();

    let mut batch = Batch::load(&batch_info)?;
    let event = process_close_batch(&ctx.accounts.registry, batch.as_mut(), &caller, now)?;
    if let Some(batch) = &batch {
        batch.store(&batch_info)?;
    }

    msg!("Closed batch {}", batch_id);
    emit!(event);

    Ok(())
}

pub fn process_open_batch(
    registry: &mut Registry,
    batch: &mut Batch,
    caller: &Pubkey,
    bump: u8,
    now: i64,
) -> Result<BatchOpened> {
    let batch_id = registry.open_next_batch(caller)?;
    Ok(batch.open(batch_id, now, bump))
}

pub fn process_close_batch(
    registry: &Registry,
    batch: Option<&mut Batch>,
    caller: &Pubkey,
    now: i64,
) -> Result<BatchClosed> {
    registry.require_owner(caller)?;
    Batch::close_existing(batch, now)
}
