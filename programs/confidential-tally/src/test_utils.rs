//! Host-side stand-ins for the coprocessor and the KMS, plus a fixture that
//! drives the processing functions the way the instruction handlers do.

use std::collections::HashMap;

use anchor_lang::prelude::*;

use crate::{
    catalog::{decryption_digest, encode_cleartexts, Catalog, Dimension, ACTIVE_CATALOG},
    constants::{FIRST_REQUEST_ID, HANDLE_TYPE_EUINT32},
    engine::{FheEngine, Handle, ProofVerifier, UNINITIALIZED_HANDLE},
    error::TallyError,
    handlers::{
        process_close_batch, process_fulfill_decryption, process_initialize, process_open_batch,
        process_request_decryption, process_submit_vote, RequestState, VoteInput, VoteState,
    },
    state::{
        Accumulator, Batch, BatchClosed, Cooldown, DecryptionCompleted, DecryptionContext,
        DecryptionRequested, Registry, VoteSubmitted,
    },
};

pub const T0: i64 = 1_700_000_000;

pub fn registry_with_owner(owner: Pubkey, cooldown_seconds: i64) -> Registry {
    let mut registry = Registry::default();
    registry
        .initialize(owner, cooldown_seconds, Pubkey::new_unique(), 255)
        .unwrap();
    registry
}

/// Engine that keeps the plaintext behind every handle it hands out.
#[derive(Clone, Default)]
pub struct PlaintextEngine {
    values: HashMap<Handle, u32>,
    constants: HashMap<u32, Handle>,
    issued: u64,
    requests: Vec<Vec<Handle>>,
    /// Makes `trivial_encrypt` return the uninitialized handle.
    pub break_trivial_encrypt: bool,
}

impl PlaintextEngine {
    fn fresh(&mut self, value: u32) -> Handle {
        self.issued += 1;
        let mut handle = UNINITIALIZED_HANDLE;
        handle[..8].copy_from_slice(&self.issued.to_le_bytes());
        handle[31] = HANDLE_TYPE_EUINT32;
        self.values.insert(handle, value);
        handle
    }

    /// Client-side encryption of a vote weight.
    pub fn encrypt(&mut self, value: u32) -> Handle {
        self.fresh(value)
    }

    pub fn decrypt(&self, handle: &Handle) -> Option<u32> {
        self.values.get(handle).copied()
    }

    pub fn requested(&self, request_id: u64) -> Option<&[Handle]> {
        let index = request_id.checked_sub(FIRST_REQUEST_ID)?;
        self.requests
            .get(usize::try_from(index).ok()?)
            .map(Vec::as_slice)
    }
}

impl FheEngine for PlaintextEngine {
    fn is_initialized(&self, handle: &Handle) -> bool {
        *handle != UNINITIALIZED_HANDLE
    }

    fn trivial_encrypt(&mut self, value: u32) -> Result<Handle> {
        if self.break_trivial_encrypt {
            return Ok(UNINITIALIZED_HANDLE);
        }
        if let Some(handle) = self.constants.get(&value) {
            return Ok(*handle);
        }
        let handle = self.fresh(value);
        self.constants.insert(value, handle);
        Ok(handle)
    }

    fn add(&mut self, lhs: &Handle, rhs: &Handle) -> Result<Handle> {
        let lhs = self.decrypt(lhs).ok_or(TallyError::NotInitialized)?;
        let rhs = self.decrypt(rhs).ok_or(TallyError::NotInitialized)?;
        Ok(self.fresh(lhs.wrapping_add(rhs)))
    }

    fn request_decryption(&mut self, handles: &[Handle], _callback: &[u8]) -> Result<u64> {
        self.requests.push(handles.to_vec());
        Ok(FIRST_REQUEST_ID + self.requests.len() as u64 - 1)
    }
}

/// KMS whose "signature" is the digest itself.
pub struct MockKms {
    pub domain: Pubkey,
}

impl Default for MockKms {
    fn default() -> Self {
        Self { domain: crate::ID }
    }
}

impl MockKms {
    pub fn sign(&self, request_id: u64, cleartexts: &[u8]) -> Vec<u8> {
        decryption_digest(&self.domain, request_id, cleartexts).to_vec()
    }

    /// Decrypts what was queued under `request_id` and signs the result.
    pub fn answer(&self, engine: &PlaintextEngine, request_id: u64) -> (Vec<u8>, Vec<u8>) {
        let counts: Vec<u32> = engine
            .requested(request_id)
            .unwrap_or_default()
            .iter()
            .map(|handle| engine.decrypt(handle).unwrap_or_default())
            .collect();
        let cleartexts = encode_cleartexts(&counts);
        let proof = self.sign(request_id, &cleartexts);
        (cleartexts, proof)
    }
}

impl ProofVerifier for MockKms {
    fn verify(&self, request_id: u64, cleartexts: &[u8], proof: &[u8]) -> Result<bool> {
        Ok(proof == self.sign(request_id, cleartexts).as_slice())
    }
}

/// In-memory deployment. Every operation works on copies and commits them
/// only on success, like a reverted transaction.
pub struct Deployment {
    pub owner: Pubkey,
    pub now: i64,
    pub registry: Registry,
    pub batches: HashMap<u64, Batch>,
    pub accumulators: HashMap<(u64, Dimension, u32), Accumulator>,
    pub cooldowns: HashMap<Pubkey, Cooldown>,
    pub contexts: HashMap<u64, DecryptionContext>,
    pub engine: PlaintextEngine,
    pub kms: MockKms,
}

impl Deployment {
    pub fn new(cooldown_seconds: i64) -> Self {
        let owner = Pubkey::new_unique();
        let mut registry = Registry::default();
        let mut first_batch = Batch::default();
        let (_, opened) = process_initialize(
            &mut registry,
            &mut first_batch,
            owner,
            cooldown_seconds,
            Pubkey::new_unique(),
            (255, 254),
            T0,
        )
        .unwrap();

        Self {
            owner,
            now: T0,
            registry,
            batches: HashMap::from([(opened.batch_id, first_batch)]),
            accumulators: HashMap::new(),
            cooldowns: HashMap::new(),
            contexts: HashMap::new(),
            engine: PlaintextEngine::default(),
            kms: MockKms::default(),
        }
    }

    pub fn advance(&mut self, seconds: i64) {
        self.now += seconds;
    }

    /// Registers a fresh provider and returns it.
    pub fn provider(&mut self) -> Pubkey {
        let provider = Pubkey::new_unique();
        let owner = self.owner;
        self.registry.add_provider(&owner, provider).unwrap();
        provider
    }

    pub fn open_batch(&mut self, caller: &Pubkey) -> Result<u64> {
        let mut registry = self.registry.clone();
        let mut batch = Batch::default();
        let opened = process_open_batch(&mut registry, &mut batch, caller, 253, self.now)?;

        self.registry = registry;
        self.batches.insert(opened.batch_id, batch);
        Ok(opened.batch_id)
    }

    pub fn close_batch(&mut self, caller: &Pubkey, batch_id: u64) -> Result<BatchClosed> {
        let mut batch = self.batches.get(&batch_id).cloned();
        let closed = process_close_batch(&self.registry, batch.as_mut(), caller, self.now)?;

        if let Some(batch) = batch {
            self.batches.insert(batch_id, batch);
        }
        Ok(closed)
    }

    pub fn submit(
        &mut self,
        provider: &Pubkey,
        batch_id: u64,
        asset_id: u32,
        type_id: u32,
        weight: u32,
    ) -> Result<VoteSubmitted> {
        let encrypted_weight = self.engine.encrypt(weight);
        self.submit_handle(
            provider,
            &VoteInput {
                batch_id,
                asset_id,
                type_id,
                encrypted_weight,
            },
        )
    }

    pub fn submit_handle(&mut self, provider: &Pubkey, vote: &VoteInput) -> Result<VoteSubmitted> {
        let mut engine = self.engine.clone();
        let mut cooldown = self.cooldown(provider);
        let mut asset_total = self.accumulator(vote.batch_id, Dimension::Asset, vote.asset_id);
        let mut type_total = self.accumulator(vote.batch_id, Dimension::Type, vote.type_id);

        let submitted = process_submit_vote(
            &mut engine,
            VoteState {
                registry: &self.registry,
                batch: self.batches.get(&vote.batch_id),
                cooldown: &mut cooldown,
                asset_total: &mut asset_total,
                type_total: &mut type_total,
            },
            provider,
            vote,
            self.now,
        )?;

        self.engine = engine;
        self.cooldowns.insert(*provider, cooldown);
        self.accumulators
            .insert((vote.batch_id, Dimension::Asset, vote.asset_id), asset_total);
        self.accumulators
            .insert((vote.batch_id, Dimension::Type, vote.type_id), type_total);
        Ok(submitted)
    }

    pub fn request(&mut self, requester: &Pubkey, batch_id: u64) -> Result<DecryptionRequested> {
        let mut engine = self.engine.clone();
        let mut cooldown = self.cooldown(requester);
        let mut context = DecryptionContext::default();
        let slots = self.slots(ACTIVE_CATALOG, batch_id);

        let requested = process_request_decryption(
            &mut engine,
            RequestState {
                registry: &self.registry,
                batch: self.batches.get(&batch_id),
                cooldown: &mut cooldown,
                decryption: &mut context,
            },
            ACTIVE_CATALOG,
            &slots,
            requester,
            self.now,
        )?;

        self.engine = engine;
        self.cooldowns.insert(*requester, cooldown);
        self.contexts.insert(requested.request_id, context);
        self.registry.next_request_id = requested.request_id + 1;
        Ok(requested)
    }

    pub fn fulfill(
        &mut self,
        request_id: u64,
        cleartexts: &[u8],
        proof: &[u8],
    ) -> Result<DecryptionCompleted> {
        let mut context = self
            .contexts
            .get(&request_id)
            .cloned()
            .ok_or(anchor_lang::error::ErrorCode::AccountNotInitialized)?;
        let catalog = Catalog::by_version(context.catalog_version).unwrap_or(ACTIVE_CATALOG);
        let slots = self.slots(catalog, context.batch_id);
        let mut engine = self.engine.clone();

        let completed = process_fulfill_decryption(
            &mut engine,
            &self.kms,
            &mut context,
            catalog,
            &slots,
            request_id,
            cleartexts,
            proof,
            self.now,
        )?;

        self.engine = engine;
        self.contexts.insert(request_id, context);
        Ok(completed)
    }

    /// Cleartexts and proof the KMS would send back for `request_id`.
    pub fn answer(&self, request_id: u64) -> (Vec<u8>, Vec<u8>) {
        self.kms.answer(&self.engine, request_id)
    }

    /// Plaintext behind a stored total, if the accumulator exists.
    pub fn total(&self, batch_id: u64, dimension: Dimension, item_id: u32) -> Option<u32> {
        self.accumulators
            .get(&(batch_id, dimension, item_id))
            .and_then(|accumulator| self.engine.decrypt(&accumulator.handle))
    }

    fn cooldown(&self, actor: &Pubkey) -> Cooldown {
        self.cooldowns.get(actor).cloned().unwrap_or(Cooldown {
            actor: *actor,
            ..Default::default()
        })
    }

    fn accumulator(&self, batch_id: u64, dimension: Dimension, item_id: u32) -> Accumulator {
        self.accumulators
            .get(&(batch_id, dimension, item_id))
            .cloned()
            .unwrap_or_else(|| {
                let mut accumulator = Accumulator::default();
                accumulator.bind(batch_id, dimension, item_id, 255);
                accumulator
            })
    }

    fn slots(&self, catalog: &Catalog, batch_id: u64) -> Vec<Option<Handle>> {
        catalog
            .entries()
            .map(|(dimension, item_id)| {
                self.accumulators
                    .get(&(batch_id, dimension, item_id))
                    .map(|accumulator| accumulator.handle)
            })
            .collect()
    }
}
