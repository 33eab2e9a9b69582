use anchor_lang::prelude::*;

use crate::{
    constants::{FIRST_BATCH_ID, FIRST_REQUEST_ID, MAX_PROVIDERS},
    error::TallyError,
    state::{
        CooldownChanged, KmsSignerChanged, OwnershipTransferred, Paused, ProviderAdded,
        ProviderRemoved, Unpaused,
    },
};

/// Deployment-wide configuration and role bookkeeping.
///
/// One registry exists per deployment, at the `[b"registry"]` PDA. It holds
/// the owner, the provider set, the pause flag, the cooldown window, the batch
/// counter and the request id allocator used by the on-chain engine.
#[account]
#[derive(InitSpace, Default, Debug)]
pub struct Registry {
    /// Account allowed to run governance instructions
    pub owner: Pubkey,
    /// Accounts allowed to submit votes and request decryptions
    #[max_len(MAX_PROVIDERS)]
    pub providers: Vec<Pubkey>,
    pub paused: bool,
    /// Minimum spacing between two gated actions of the same kind by one actor
    pub cooldown_seconds: i64,
    /// Id of the most recently opened batch
    pub current_batch_id: u64,
    /// Next id the engine hands out for a decryption request
    pub next_request_id: u64,
    /// Ed25519 identity of the decryption oracle
    pub kms_signer: Pubkey,
    pub bump: u8,
}

impl Registry {
    /// Seeds the owner as the sole provider and reserves batch 1.
    pub fn initialize(
        &mut self,
        owner: Pubkey,
        cooldown_seconds: i64,
        kms_signer: Pubkey,
        bump: u8,
    ) -> Result<ProviderAdded> {
        require!(cooldown_seconds >= 0, TallyError::InvalidCooldown);

        self.owner = owner;
        self.providers = vec![owner];
        self.paused = false;
        self.cooldown_seconds = cooldown_seconds;
        self.current_batch_id = FIRST_BATCH_ID;
        self.next_request_id = FIRST_REQUEST_ID;
        self.kms_signer = kms_signer;
        self.bump = bump;

        Ok(ProviderAdded { provider: owner })
    }

    pub fn require_owner(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(*caller, self.owner, TallyError::NotOwner);
        Ok(())
    }

    pub fn is_provider(&self, account: &Pubkey) -> bool {
        self.providers.contains(account)
    }

    pub fn require_provider(&self, caller: &Pubkey) -> Result<()> {
        require!(self.is_provider(caller), TallyError::NotProvider);
        Ok(())
    }

    pub fn require_not_paused(&self) -> Result<()> {
        require!(!self.paused, TallyError::PausedState);
        Ok(())
    }

    pub fn transfer_ownership(
        &mut self,
        caller: &Pubkey,
        new_owner: Pubkey,
    ) -> Result<OwnershipTransferred> {
        self.require_owner(caller)?;

        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        Ok(OwnershipTransferred {
            previous_owner,
            new_owner,
        })
    }

    /// Returns `None` when `provider` was already present.
    pub fn add_provider(
        &mut self,
        caller: &Pubkey,
        provider: Pubkey,
    ) -> Result<Option<ProviderAdded>> {
        self.require_owner(caller)?;

        if self.is_provider(&provider) {
            return Ok(None);
        }
        require!(
            self.providers.len() < MAX_PROVIDERS,
            TallyError::ProviderCapacityReached
        );

        self.providers.push(provider);
        Ok(Some(ProviderAdded { provider }))
    }

    /// Returns `None` when `provider` was not present.
    pub fn remove_provider(
        &mut self,
        caller: &Pubkey,
        provider: Pubkey,
    ) -> Result<Option<ProviderRemoved>> {
        self.require_owner(caller)?;

        let Some(index) = self.providers.iter().position(|p| *p == provider) else {
            return Ok(None);
        };
        self.providers.swap_remove(index);
        Ok(Some(ProviderRemoved { provider }))
    }

    pub fn pause(&mut self, caller: &Pubkey) -> Result<Paused> {
        self.require_owner(caller)?;
        self.require_not_paused()?;

        self.paused = true;
        Ok(Paused { account: *caller })
    }

    // Unlike `pause`, unpausing an unpaused registry is accepted and still notifies.
    pub fn unpause(&mut self, caller: &Pubkey) -> Result<Unpaused> {
        self.require_owner(caller)?;

        self.paused = false;
        Ok(Unpaused { account: *caller })
    }

    pub fn set_cooldown(&mut self, caller: &Pubkey, seconds: i64) -> Result<CooldownChanged> {
        self.require_owner(caller)?;
        require!(seconds >= 0, TallyError::InvalidCooldown);

        let old_seconds = std::mem::replace(&mut self.cooldown_seconds, seconds);
        Ok(CooldownChanged {
            old_seconds,
            new_seconds: seconds,
        })
    }

    pub fn set_kms_signer(&mut self, caller: &Pubkey, signer: Pubkey) -> Result<KmsSignerChanged> {
        self.require_owner(caller)?;

        let previous = std::mem::replace(&mut self.kms_signer, signer);
        Ok(KmsSignerChanged {
            previous,
            current: signer,
        })
    }

    /// Advances the batch counter and returns the id of the batch to open.
    pub fn open_next_batch(&mut self, caller: &Pubkey) -> Result<u64> {
        self.require_owner(caller)?;

        self.current_batch_id = self
            .current_batch_id
            .checked_add(1)
            .ok_or(TallyError::ArithmeticOverflow)?;
        Ok(self.current_batch_id)
    }
}
