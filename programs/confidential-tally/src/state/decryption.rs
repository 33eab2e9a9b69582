use anchor_lang::prelude::*;

use crate::{
    catalog::TallyCounts,
    constants::MAX_CATALOG_ITEMS,
    error::TallyError,
    state::DecryptionCompleted,
};

/// Binds a decryption request id to the snapshot it covers.
///
/// Contexts are never closed: a processed context is both the published
/// result and the replay guard for its request id.
#[account]
#[derive(InitSpace, Default, Debug, PartialEq, Eq)]
pub struct DecryptionContext {
    pub request_id: u64,
    pub batch_id: u64,
    /// Version of the catalog the snapshot was built from
    pub catalog_version: u8,
    pub state_hash: [u8; 32],
    pub processed: bool,
    pub requester: Pubkey,
    pub requested_at: i64,
    pub fulfilled_at: Option<i64>,
    #[max_len(MAX_CATALOG_ITEMS)]
    pub asset_counts: Vec<u32>,
    #[max_len(MAX_CATALOG_ITEMS)]
    pub type_counts: Vec<u32>,
    pub bump: u8,
}

impl DecryptionContext {
    pub fn require_pending(&self) -> Result<()> {
        require!(!self.processed, TallyError::ReplayDetected);
        Ok(())
    }

    /// Publishes the decoded counts and consumes the request.
    pub fn complete(&mut self, counts: TallyCounts, now: i64) -> Result<DecryptionCompleted> {
        self.require_pending()?;

        self.processed = true;
        self.fulfilled_at = Some(now);
        self.asset_counts = counts.asset_counts.clone();
        self.type_counts = counts.type_counts.clone();

        Ok(DecryptionCompleted {
            request_id: self.request_id,
            batch_id: self.batch_id,
            asset_counts: counts.asset_counts,
            type_counts: counts.type_counts,
        })
    }
}
