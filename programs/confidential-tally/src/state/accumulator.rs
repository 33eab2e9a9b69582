use anchor_lang::prelude::*;

use crate::{
    catalog::{accumulator_address, Catalog, Dimension},
    engine::{FheEngine, Handle},
    error::TallyError,
};

/// Encrypted running total for one item of one dimension within one batch.
#[account]
#[derive(InitSpace, Default, Debug, PartialEq, Eq)]
pub struct Accumulator {
    pub batch_id: u64,
    /// `Dimension` discriminant
    pub dimension: u8,
    pub item_id: u32,
    /// Ciphertext handle of the encrypted `u32` total; all zero until first vote
    pub handle: [u8; 32],
    pub bump: u8,
}

impl Accumulator {
    /// Records which key a freshly created account belongs to.
    pub fn bind(&mut self, batch_id: u64, dimension: Dimension, item_id: u32, bump: u8) {
        self.batch_id = batch_id;
        self.dimension = dimension as u8;
        self.item_id = item_id;
        self.bump = bump;
    }

    /// Handle of the total after adding `weight`, without writing it.
    ///
    /// An accumulator that was never written is first established as an
    /// encrypted zero.
    pub fn next_total<E: FheEngine>(&self, engine: &mut E, weight: &Handle) -> Result<Handle> {
        let current = if engine.is_initialized(&self.handle) {
            self.handle
        } else {
            let zero = engine.trivial_encrypt(0)?;
            require!(engine.is_initialized(&zero), TallyError::NotInitialized);
            zero
        };
        engine.add(&current, weight)
    }

    pub fn load(info: &AccountInfo) -> Result<Option<Self>> {
        if info.owner != &crate::ID || info.data_is_empty() {
            return Ok(None);
        }
        let data = info.try_borrow_data()?;
        let accumulator = Self::try_deserialize(&mut &data[..])?;
        Ok(Some(accumulator))
    }
}

/// Reads the catalog accumulators of `batch_id` from `accounts`, which must
/// be the accumulator PDAs in snapshot order. Never-created accounts come back
/// as `None`.
pub fn load_catalog_slots(
    catalog: &Catalog,
    batch_id: u64,
    accounts: &[AccountInfo],
) -> Result<Vec<Option<Handle>>> {
    require_eq!(
        accounts.len(),
        catalog.len(),
        TallyError::AccumulatorMismatch
    );

    catalog
        .entries()
        .zip(accounts)
        .map(|((dimension, item_id), info)| {
            let (expected, _) = accumulator_address(batch_id, dimension, item_id);
            require_keys_eq!(info.key(), expected, TallyError::AccumulatorMismatch);
            Ok(Accumulator::load(info)?.map(|accumulator| accumulator.handle))
        })
        .collect()
}
