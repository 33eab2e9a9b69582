use anchor_lang::prelude::*;

use crate::{
    error::TallyError,
    state::{BatchClosed, BatchOpened},
};

/// One voting round.
#[account]
#[derive(InitSpace, Default, Debug, PartialEq, Eq)]
pub struct Batch {
    pub id: u64,
    pub is_open: bool,
    pub start_time: i64,
    /// Zero until the batch is closed
    pub end_time: i64,
    pub bump: u8,
}

impl Batch {
    pub fn open(&mut self, id: u64, now: i64, bump: u8) -> BatchOpened {
        self.id = id;
        self.is_open = true;
        self.start_time = now;
        self.end_time = 0;
        self.bump = bump;

        BatchOpened {
            batch_id: id,
            start_time: now,
        }
    }

    /// Lifecycle transition behind `close_batch`.
    ///
    /// A batch that never existed and one that is already closed both fail
    /// with `InvalidBatch`.
    pub fn close_existing(batch: Option<&mut Self>, now: i64) -> Result<BatchClosed> {
        match batch {
            Some(batch) => batch.close(now),
            None => err!(TallyError::InvalidBatch),
        }
    }

    pub fn close(&mut self, now: i64) -> Result<BatchClosed> {
        require!(self.is_open, TallyError::InvalidBatch);

        self.is_open = false;
        self.end_time = now;
        Ok(BatchClosed {
            batch_id: self.id,
            end_time: now,
        })
    }

    /// Reads the batch stored at `info`, if one was ever created there.
    ///
    /// The caller is expected to have checked the address against the batch
    /// PDA. An address the program does not own, or one without data, has never
    /// held a batch.
    pub fn load(info: &AccountInfo) -> Result<Option<Self>> {
        if info.owner != &crate::ID || info.data_is_empty() {
            return Ok(None);
        }
        let data = info.try_borrow_data()?;
        let batch = Self::try_deserialize(&mut &data[..])?;
        Ok(Some(batch))
    }

    pub fn store(&self, info: &AccountInfo) -> Result<()> {
        let mut data = info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data[..];
        self.try_serialize(&mut writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_then_close_is_terminal() {
        let mut batch = Batch::default();
        let opened = batch.open(3, 100, 255);
        assert_eq!(
            opened,
            BatchOpened {
                batch_id: 3,
                start_time: 100
            }
        );
        assert!(batch.is_open);
        assert_eq!(batch.end_time, 0);

        let closed = Batch::close_existing(Some(&mut batch), 250).unwrap();
        assert_eq!(closed.end_time, 250);
        assert!(!batch.is_open);

        assert_eq!(
            Batch::close_existing(Some(&mut batch), 300).unwrap_err(),
            TallyError::InvalidBatch.into()
        );
        assert_eq!(batch.end_time, 250);
    }

    #[test]
    fn closing_a_missing_batch_is_invalid() {
        assert_eq!(
            Batch::close_existing(None, 10).unwrap_err(),
            TallyError::InvalidBatch.into()
        );
    }

    #[test]
    fn load_treats_foreign_accounts_as_missing() {
        let key = Pubkey::new_unique();
        let owner = Pubkey::default();
        let mut lamports = 0;
        let mut data = vec![];
        let info = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &owner, false, 0);

        assert_eq!(Batch::load(&info).unwrap(), None);
    }

    #[test]
    fn store_then_load_round_trips_through_account_data() {
        let key = Pubkey::new_unique();
        let mut lamports = 0;
        let mut data = vec![0u8; 8 + Batch::INIT_SPACE];
        let info = AccountInfo::new(
            &key,
            false,
            true,
            &mut lamports,
            &mut data,
            &crate::ID,
            false,
            0,
        );

        let mut batch = Batch::default();
        batch.open(1, 42, 254);
        batch.store(&info).unwrap();

        assert_eq!(Batch::load(&info).unwrap(), Some(batch));
    }
}
