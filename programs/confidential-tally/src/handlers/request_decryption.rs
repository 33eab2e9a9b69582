use anchor_lang::prelude::*;

use crate::{
    catalog::{Catalog, ACTIVE_CATALOG},
    constants::{BATCH_SEED, COOLDOWN_SEED, DECRYPTION_SEED, REGISTRY_SEED},
    engine::{FheEngine, Handle, SymbolicEngine},
    error::TallyError,
    instruction::FulfillDecryption,
    state::{
        load_catalog_slots, ActionKind, Batch, Cooldown, DecryptionContext, DecryptionRequested,
        Registry,
    },
};

/// Remaining accounts: the accumulator PDAs of every catalog item for
/// `batch_id`, in snapshot order. Accumulators that were never created are
/// passed as their (empty) derived addresses.
#[derive(Accounts)]
#[instruction(batch_id: u64)]
pub struct RequestDecryption<'info> {
    #[account(mut)]
    pub provider: Signer<'info>,

    #[account(
        mut,
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
        init,
        payer = provider,
        space = 8 + DecryptionContext::INIT_SPACE,
        seeds = [DECRYPTION_SEED, registry.next_request_id.to_le_bytes().as_ref()],
        bump,
    )]
    pub decryption: Box<Account<'info, DecryptionContext>>,

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

pub struct RequestState<'a> {
    pub registry: &'a Registry,
    pub batch: Option<&'a Batch>,
    pub cooldown: &'a mut Cooldown,
    pub decryption: &'a mut DecryptionContext,
}

/// Snapshots every catalog total of a closed batch and asks the KMS to
/// decrypt them. The counts arrive later through `fulfill_decryption`.
///
/// # Arguments
/// * `batch_id` - Closed batch whose totals are decrypted
pub fn request_decryption(ctx: Context<RequestDecryption>, batch_id: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let requester = ctx.accounts.provider.key();
    let batch = Batch::load(&ctx.accounts.batch.to_account_info())?;
    let slots = load_catalog_slots(ACTIVE_CATALOG, batch_id, ctx.remaining_accounts)?;

    let accounts = &mut *ctx.accounts;
    accounts.cooldown.actor = requester;
    accounts.cooldown.bump = ctx.bumps.cooldown;
    accounts.decryption.bump = ctx.bumps.decryption;

    let expected_request_id = accounts.registry.next_request_id;
    let mut engine = SymbolicEngine::new(crate::ID, expected_request_id);
    let event = process_request_decryption(
        &mut engine,
        RequestState {
            registry: &accounts.registry,
            batch: batch.as_ref(),
            cooldown: &mut accounts.cooldown,
            decryption: &mut accounts.decryption,
        },
        ACTIVE_CATALOG,
        &slots,
        &requester,
        now,
    )?;

    // The context PDA was derived from the id the engine was expected to hand out.
    require_eq!(
        event.request_id,
        expected_request_id,
        TallyError::RequestIdMismatch
    );
    accounts.registry.next_request_id = engine.next_request_id();

    msg!(
        "Decryption request {} queued for batch {}",
        event.request_id,
        batch_id
    );
    engine.emit_journal();
    emit!(event);

    Ok(())
}

pub fn process_request_decryption<E: FheEngine>(
    engine: &mut E,
    state: RequestState<'_>,
    catalog: &Catalog,
    slots: &[Option<Handle>],
    requester: &Pubkey,
    now: i64,
) -> Result<DecryptionRequested> {
    let RequestState {
        registry,
        batch,
        cooldown,
        decryption,
    } = state;

    registry.require_provider(requester)?;
    registry.require_not_paused()?;
    cooldown.check(ActionKind::DecryptionRequest, now, registry.cooldown_seconds)?;
    let batch = batch.ok_or(TallyError::InvalidBatch)?;
    require!(!batch.is_open, TallyError::BatchNotOpen);

    let handles = catalog.snapshot(engine, slots)?;
    let state_hash = catalog.state_hash(&handles, &crate::ID);
    let request_id = engine.request_decryption(&handles, FulfillDecryption::DISCRIMINATOR)?;

    decryption.request_id = request_id;
    decryption.batch_id = batch.id;
    decryption.catalog_version = catalog.version;
    decryption.state_hash = state_hash;
    decryption.processed = false;
    decryption.requester = *requester;
    decryption.requested_at = now;
    decryption.fulfilled_at = None;
    decryption.asset_counts.clear();
    decryption.type_counts.clear();

    cooldown.record(ActionKind::DecryptionRequest, now);

    Ok(DecryptionRequested {
        request_id,
        batch_id: batch.id,
        state_hash,
    })
}
