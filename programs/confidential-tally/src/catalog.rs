//! The item catalog a decryption covers, and everything derived from it.
//!
//! Request and callback must build the same ordered list of handles, so both
//! go through [`Catalog::snapshot`] and hash with [`Catalog::state_hash`].
//! The catalog is a protocol constant, not derived from what was voted on.

use anchor_lang::prelude::*;
use solana_sha256_hasher::hashv;

use crate::{
    constants::{
        ACCUMULATOR_SEED, ASSET_DIMENSION_SEED, DECRYPTION_DIGEST_TAG, STATE_HASH_TAG,
        TYPE_DIMENSION_SEED,
    },
    engine::{FheEngine, Handle},
    error::TallyError,
};

/// Bytes per cleartext in a decryption result (little-endian `u32`).
pub const CLEARTEXT_STRIDE: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Dimension {
    Asset = 0,
    Type = 1,
}

impl Dimension {
    pub fn seed(self) -> &'static [u8] {
        match self {
            Dimension::Asset => ASSET_DIMENSION_SEED,
            Dimension::Type => TYPE_DIMENSION_SEED,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Catalog {
    pub version: u8,
    pub asset_ids: &'static [u32],
    pub type_ids: &'static [u32],
}

pub const CATALOG_V1: Catalog = Catalog {
    version: 1,
    asset_ids: &[1, 2],
    type_ids: &[1, 2, 3],
};

/// Catalog new decryption requests are built against.
pub const ACTIVE_CATALOG: &Catalog = &CATALOG_V1;

const KNOWN_CATALOGS: &[&Catalog] = &[&CATALOG_V1];

/// Decoded decryption result, in catalog order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TallyCounts {
    pub asset_counts: Vec<u32>,
    pub type_counts: Vec<u32>,
}

impl Catalog {
    pub fn by_version(version: u8) -> Option<&'static Catalog> {
        KNOWN_CATALOGS
            .iter()
            .copied()
            .find(|catalog| catalog.version == version)
    }

    pub fn len(&self) -> usize {
        self.asset_ids.len() + self.type_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot order: asset ids as declared, then type ids as declared.
    pub fn entries(&self) -> impl Iterator<Item = (Dimension, u32)> + '_ {
        let assets = self.asset_ids.iter().map(|id| (Dimension::Asset, *id));
        let types = self.type_ids.iter().map(|id| (Dimension::Type, *id));
        assets.chain(types)
    }

    /// Resolves accumulator slots into the ordered handle list.
    ///
    /// `slots` holds one entry per catalog item in snapshot order: `None` for
    /// an accumulator that was never created, which stands for an encrypted
    /// zero. An accumulator that exists with an uninitialized handle is
    /// malformed and fails with `NotInitialized`.
    pub fn snapshot<E: FheEngine>(
        &self,
        engine: &mut E,
        slots: &[Option<Handle>],
    ) -> Result<Vec<Handle>> {
        require_eq!(slots.len(), self.len(), TallyError::AccumulatorMismatch);

        let mut handles = Vec::with_capacity(slots.len());
        for slot in slots {
            let handle = match slot {
                Some(handle) => *handle,
                None => engine.trivial_encrypt(0)?,
            };
            require!(engine.is_initialized(&handle), TallyError::NotInitialized);
            handles.push(handle);
        }
        Ok(handles)
    }

    /// Commitment over the ordered snapshot and the deployment identity.
    pub fn state_hash(&self, handles: &[Handle], domain: &Pubkey) -> [u8; 32] {
        let version = [self.version];
        let mut parts: Vec<&[u8]> = Vec::with_capacity(handles.len() + 3);
        parts.push(STATE_HASH_TAG);
        parts.push(&version);
        parts.extend(handles.iter().map(|handle| handle.as_slice()));
        parts.push(domain.as_ref());
        hashv(&parts).to_bytes()
    }

    pub fn decode_cleartexts(&self, blob: &[u8]) -> Result<TallyCounts> {
        require_eq!(
            blob.len(),
            self.len() * CLEARTEXT_STRIDE,
            TallyError::MalformedCleartexts
        );

        let mut words = blob
            .chunks_exact(CLEARTEXT_STRIDE)
            .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]));
        let asset_counts = words.by_ref().take(self.asset_ids.len()).collect();
        let type_counts = words.collect();
        Ok(TallyCounts {
            asset_counts,
            type_counts,
        })
    }
}

/// Inverse of [`Catalog::decode_cleartexts`], used by the oracle side.
pub fn encode_cleartexts(counts: &[u32]) -> Vec<u8> {
    counts.iter().flat_map(|count| count.to_le_bytes()).collect()
}

/// Message the KMS signs for a decryption result.
pub fn decryption_digest(domain: &Pubkey, request_id: u64, cleartexts: &[u8]) -> [u8; 32] {
    hashv(&[
        DECRYPTION_DIGEST_TAG,
        domain.as_ref(),
        &request_id.to_le_bytes(),
        cleartexts,
    ])
    .to_bytes()
}

pub fn accumulator_address(batch_id: u64, dimension: Dimension, item_id: u32) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            ACCUMULATOR_SEED,
            &batch_id.to_le_bytes(),
            dimension.seed(),
            &item_id.to_le_bytes(),
        ],
        &crate::ID,
    )
}
