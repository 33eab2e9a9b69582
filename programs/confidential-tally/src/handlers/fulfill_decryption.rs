use anchor_lang::prelude::*;

use crate::{
    catalog::Catalog,
    constants::{DECRYPTION_SEED, REGISTRY_SEED},
    engine::{FheEngine, Handle, KmsSignatureVerifier, ProofVerifier, SymbolicEngine},
    error::TallyError,
    state::{load_catalog_slots, DecryptionCompleted, DecryptionContext, Registry},
};

/// Remaining accounts: the same accumulator PDAs the request snapshotted,
/// in snapshot order.
#[derive(Accounts)]
#[instruction(request_id: u64)]
pub struct FulfillDecryption<'info> {
    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump,
    )]
    pub registry: Account<'info, Registry>,

    #[account(
        mut,
        seeds = [DECRYPTION_SEED, request_id.to_le_bytes().as_ref()],
        bump = decryption.bump,
    )]
    pub decryption: Box<Account<'info, DecryptionContext>>,

    /// CHECK: address constrained to the instructions sysvar
    #[account(address = solana_instructions_sysvar::ID)]
    pub instructions_sysvar: UncheckedAccount<'info>,
}

/// Oracle callback carrying the decrypted counts of a pending request.
///
/// Anyone may submit it. The result is only accepted when the totals still
/// match the snapshot taken at request time and the KMS signature over the
/// cleartexts checks out.
///
/// # Arguments
/// * `request_id` - Id handed out by `request_decryption`
/// * `cleartexts` - One little-endian `u32` per catalog entry, in snapshot order
/// * `proof` - KMS ed25519 signature over the decryption digest
pub fn fulfill_decryption(
    ctx: Context<FulfillDecryption>,
    request_id: u64,
    cleartexts: Vec<u8>,
    proof: Vec<u8>,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    ctx.accounts.decryption.require_pending()?;
    let catalog = Catalog::by_version(ctx.accounts.decryption.catalog_version)
        .ok_or(TallyError::StateMismatch)?;
    let slots = load_catalog_slots(
        catalog,
        ctx.accounts.decryption.batch_id,
        ctx.remaining_accounts,
    )?;

    let sysvar = ctx.accounts.instructions_sysvar.to_account_info();
    let verifier = KmsSignatureVerifier {
        instructions_sysvar: &sysvar,
        signer: ctx.accounts.registry.kms_signer,
        domain: crate::ID,
    };
    let mut engine = SymbolicEngine::new(crate::ID, ctx.accounts.registry.next_request_id);

    let event = process_fulfill_decryption(
        &mut engine,
        &verifier,
        &mut ctx.accounts.decryption,
        catalog,
        &slots,
        request_id,
        &cleartexts,
        &proof,
        now,
    )?;

    msg!(
        "Decryption request {} fulfilled for batch {}",
        request_id,
        event.batch_id
    );
    emit!(event);

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn process_fulfill_decryption<E: FheEngine, V: ProofVerifier>(
    engine: &mut E,
    verifier: &V,
    decryption: &mut DecryptionContext,
    catalog: &Catalog,
    slots: &[Option<Handle>],
    request_id: u64,
    cleartexts: &[u8],
    proof: &[u8],
    now: i64,
) -> Result<DecryptionCompleted> {
    decryption.require_pending()?;
    require_eq!(
        decryption.request_id,
        request_id,
        TallyError::RequestIdMismatch
    );

    require_eq!(
        decryption.catalog_version,
        catalog.version,
        TallyError::StateMismatch
    );
    let handles = catalog.snapshot(engine, slots)?;
    require!(
        catalog.state_hash(&handles, &crate::ID) == decryption.state_hash,
        TallyError::StateMismatch
    );

    require!(
        verifier.verify(request_id, cleartexts, proof)?,
        TallyError::InvalidProof
    );

    let counts = catalog.decode_cleartexts(cleartexts)?;
    decryption.complete(counts, now)
}
