// Stops Rust Analyzer complaining about missing configs
// See https://solana.stackexchange.com/questions/17777
#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;

pub mod catalog;
pub mod constants;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod state;

pub use error::TallyError;
pub use handlers::*;

declare_id!("FDu3fAuDJSPXEsM5o6FqcDEpBsnZBQnbydvKEBqrsbUi");

#[program]
pub mod confidential_tally {
    use super::*;

    pub fn initialize(
        ctx: Context<Initialize>,
        cooldown_seconds: i64,
        kms_signer: Pubkey,
    ) -> Result<()> {
        handlers::initialize::initialize(ctx, cooldown_seconds, kms_signer)
    }

    pub fn transfer_ownership(ctx: Context<Govern>, new_owner: Pubkey) -> Result<()> {
        handlers::governance::transfer_ownership(ctx, new_owner)
    }

    pub fn add_provider(ctx: Context<Govern>, provider: Pubkey) -> Result<()> {
        handlers::governance::add_provider(ctx, provider)
    }

    pub fn remove_provider(ctx: Context<Govern>, provider: Pubkey) -> Result<()> {
        handlers::governance::remove_provider(ctx, provider)
    }

    pub fn pause(ctx: Context<Govern>) -> Result<()> {
        handlers::governance::pause(ctx)
    }

    pub fn unpause(ctx: Context<Govern>) -> Result<()> {
        handlers::governance::unpause(ctx)
    }

    pub fn set_cooldown(ctx: Context<Govern>, seconds: i64) -> Result<()> {
        handlers::governance::set_cooldown(ctx, seconds)
    }

    pub fn set_kms_signer(ctx: Context<Govern>, signer: Pubkey) -> Result<()> {
        handlers::governance::set_kms_signer(ctx, signer)
    }

    pub fn open_batch(ctx: Context<OpenBatch>) -> Result<()> {
        handlers::batch_lifecycle::open_batch(ctx)
    }

    pub fn close_batch(ctx: Context<CloseBatch>, batch_id: u64) -> Result<()> {
        handlers::batch_lifecycle::close_batch(ctx, batch_id)
    }

    pub fn submit_vote(
        ctx: Context<SubmitVote>,
        batch_id: u64,
        asset_id: u32,
        type_id: u32,
        encrypted_weight: [u8; 32],
    ) -> Result<()> {
        handlers::submit_vote::submit_vote(ctx, batch_id, asset_id, type_id, encrypted_weight)
    }

    pub fn request_decryption(ctx: Context<RequestDecryption>, batch_id: u64) -> Result<()> {
        handlers::request_decryption::request_decryption(ctx, batch_id)
    }

    pub fn fulfill_decryption(
        ctx: Context<FulfillDecryption>,
        request_id: u64,
        cleartexts: Vec<u8>,
        proof: Vec<u8>,
    ) -> Result<()> {
        handlers::fulfill_decryption::fulfill_decryption(ctx, request_id, cleartexts, proof)
    }
}

#[cfg(test)]
mod test_utils;
