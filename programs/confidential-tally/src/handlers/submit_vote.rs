use anchor_lang::prelude::*;

use crate::{
    catalog::Dimension,
    constants::{
        ACCUMULATOR_SEED, ASSET_DIMENSION_SEED, BATCH_SEED, COOLDOWN_SEED, REGISTRY_SEED,
        TYPE_DIMENSION_SEED,
    },
    engine::{FheEngine, Handle, SymbolicEngine},
    error::TallyError,
    state::{Accumulator, ActionKind, Batch, Cooldown, Registry, VoteSubmitted},
};

#[derive(Accounts)]
#[instruction(batch_id: u64, asset_id: u32, type_id: u32)]
pub struct SubmitVote<'info> {
    #[account(mut)]
    pub provider: Signer<'info>,

    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
    )]
    pub registry: Account<'info, Registry>,

    /// CHECK: batch PDA for `batch_id`, which may never have been created; read through `Batch::load`
    #[account(
        seeds = [BATCH_SEED, batch_id.to_le_bytes().as_ref()],
        bump,
    )]
    pub batch: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = provider,
        space = 8 + Accumulator::INIT_SPACE,
        seeds = [
            ACCUMULATOR_SEED,
            batch_id.to_le_bytes().as_ref(),
            ASSET_DIMENSION_SEED,
            asset_id.to_le_bytes().as_ref(),
        ],
        bump,
    )]
    pub asset_total: Box<Account<'info, Accumulator>>,

    #[account(
        init_if_needed,
        payer = provider,
        space = 8 + Accumulator::INIT_SPACE,
        seeds = [
            ACCUMULATOR_SEED,
            batch_id.to_le_bytes().as_ref(),
            TYPE_DIMENSION_SEED,
            type_id.to_le_bytes().as_ref(),
        ],
        bump,
    )]
    pub type_total: Box<Account<'info, Accumulator>>,

    #[account(
        init_if_needed,
        payer = provider,
        space = 8 + Cooldown::INIT_SPACE,
        seeds = [COOLDOWN_SEED, provider.key().as_ref()],
        bump,
    )]
    pub cooldown: Account<'info, Cooldown>,

    pub system_program: Program<'info, System>,
}

#[derive(Clone, Copy, Debug)]
pub struct VoteInput {
    pub batch_id: u64,
    pub asset_id: u32,
    pub type_id: u32,
    pub encrypted_weight: Handle,
}

/// Accounts a vote reads and writes, already loaded.
pub struct VoteState<'a> {
    pub registry: &'a Registry,
    pub batch: Option<&'a Batch>,
    pub cooldown: &'a mut Cooldown,
    pub asset_total: &'a mut Accumulator,
    pub type_total: &'a mut Accumulator,
}

/// Adds an encrypted weight to the batch's asset and type totals.
///
/// The weight stays encrypted: the program only derives the handles of the
/// new totals, and the emitted event names the batch and items but not the
/// weight.
///
/// # Arguments
/// * `batch_id` - Open batch the vote belongs to
/// * `asset_id` - Item the weight is tallied under in the asset dimension
/// * `type_id` - Item the weight is tallied under in the type dimension
/// * `encrypted_weight` - Ciphertext handle of the encrypted `u32` weight
pub fn submit_vote(
    ctx: Context<SubmitVote>,
    batch_id: u64,
    asset_id: u32,
    type_id: u32,
    encrypted_weight: [u8; 32],
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let provider = ctx.accounts.provider.key();
    let batch = Batch::load(&ctx.accounts.batch.to_account_info())?;

    let accounts = &mut *ctx.accounts;
    accounts
        .asset_total
        .bind(batch_id, Dimension::Asset, asset_id, ctx.bumps.asset_total);
    accounts
        .type_total
        .bind(batch_id, Dimension::Type, type_id, ctx.bumps.type_total);
    accounts.cooldown.actor = provider;
    accounts.cooldown.bump = ctx.bumps.cooldown;

    let mut engine = SymbolicEngine::new(crate::ID, accounts.registry.next_request_id);
    let vote = VoteInput {
        batch_id,
        asset_id,
        type_id,
        encrypted_weight,
    };
    let event = process_submit_vote(
        &mut engine,
        VoteState {
            registry: &accounts.registry,
            batch: batch.as_ref(),
            cooldown: &mut accounts.cooldown,
            asset_total: &mut accounts.asset_total,
            type_total: &mut accounts.type_total,
        },
        &provider,
        &vote,
        now,
    )?;

    msg!(
        "Vote recorded in batch {} for asset {} and type {}",
        batch_id,
        asset_id,
        type_id
    );
    engine.emit_journal();
    emit!(event);

    Ok(())
}

pub fn process_submit_vote<E: FheEngine>(
    engine: &mut E,
    state: VoteState<'_>,
    provider: &Pubkey,
    vote: &VoteInput,
    now: i64,
) -> Result<VoteSubmitted> {
    let VoteState {
        registry,
        batch,
        cooldown,
        asset_total,
        type_total,
    } = state;

    registry.require_provider(provider)?;
    registry.require_not_paused()?;
    cooldown.check(ActionKind::Submission, now, registry.cooldown_seconds)?;
    require!(
        batch.is_some_and(|batch| batch.is_open),
        TallyError::BatchNotOpen
    );
    require!(
        engine.is_initialized(&vote.encrypted_weight),
        TallyError::NotInitialized
    );

    // Both totals are computed before either is written.
    let next_asset_total = asset_total.next_total(engine, &vote.encrypted_weight)?;
    let next_type_total = type_total.next_total(engine, &vote.encrypted_weight)?;
    asset_total.handle = next_asset_total;
    type_total.handle = next_type_total;

    cooldown.record(ActionKind::Submission, now);

    Ok(VoteSubmitted {
        provider: *provider,
        batch_id: vote.batch_id,
        asset_id: vote.asset_id,
        type_id: vote.type_id,
    })
}
