use anchor_lang::prelude::*;
use solana_sha256_hasher::hashv;

use crate::{
    constants::{HANDLE_TYPE_EUINT32, OP_ADD_TAG, OP_TRIVIAL_TAG},
    engine::{FheEngine, Handle, UNINITIALIZED_HANDLE},
    error::TallyError,
    state::{DecryptionQueued, HandleComputed},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FheOp {
    TrivialEncrypt = 0,
    Add = 1,
}

/// Work the engine produced during one instruction, for the off-chain side.
#[derive(Debug, PartialEq, Eq)]
pub enum EngineEvent {
    Computed(HandleComputed),
    Queued(DecryptionQueued),
}

/// On-chain half of the engine.
///
/// Ciphertexts live with the off-chain coprocessor; on chain only their
/// handles are derived. A result handle is a hash of the operation, the
/// deployment and the operand handles, so the coprocessor can replay the
/// journal and arrive at the same identifiers.
pub struct SymbolicEngine {
    domain: Pubkey,
    next_request_id: u64,
    journal: Vec<EngineEvent>,
}

impl SymbolicEngine {
    pub fn new(domain: Pubkey, next_request_id: u64) -> Self {
        Self {
            domain,
            next_request_id,
            journal: Vec::new(),
        }
    }

    /// Value to persist back into `Registry::next_request_id`.
    pub fn next_request_id(&self) -> u64 {
        self.next_request_id
    }

    pub fn journal(&self) -> &[EngineEvent] {
        &self.journal
    }

    pub fn emit_journal(self) {
        for event in self.journal {
            match event {
                EngineEvent::Computed(computed) => emit!(computed),
                EngineEvent::Queued(queued) => emit!(queued),
            }
        }
    }

    fn derive(&self, tag: &[u8], operands: &[&[u8]]) -> Handle {
        let mut parts: Vec<&[u8]> = Vec::with_capacity(operands.len() + 2);
        parts.push(tag);
        parts.push(self.domain.as_ref());
        parts.extend_from_slice(operands);

        let mut handle = hashv(&parts).to_bytes();
        handle[31] = HANDLE_TYPE_EUINT32;
        handle
    }
}

impl FheEngine for SymbolicEngine {
    fn is_initialized(&self, handle: &Handle) -> bool {
        *handle != UNINITIALIZED_HANDLE
    }

    fn trivial_encrypt(&mut self, value: u32) -> Result<Handle> {
        let plaintext = value.to_le_bytes();
        let result = self.derive(OP_TRIVIAL_TAG, &[plaintext.as_slice()]);

        let mut lhs = UNINITIALIZED_HANDLE;
        lhs[..plaintext.len()].copy_from_slice(&plaintext);
        self.journal.push(EngineEvent::Computed(HandleComputed {
            op: FheOp::TrivialEncrypt as u8,
            lhs,
            rhs: UNINITIALIZED_HANDLE,
            result,
        }));
        Ok(result)
    }

    fn add(&mut self, lhs: &Handle, rhs: &Handle) -> Result<Handle> {
        require!(
            self.is_initialized(lhs) && self.is_initialized(rhs),
            TallyError::NotInitialized
        );

        let result = self.derive(OP_ADD_TAG, &[lhs.as_slice(), rhs.as_slice()]);
        self.journal.push(EngineEvent::Computed(HandleComputed {
            op: FheOp::Add as u8,
            lhs: *lhs,
            rhs: *rhs,
            result,
        }));
        Ok(result)
    }

    fn request_decryption(&mut self, handles: &[Handle], callback: &[u8]) -> Result<u64> {
        require!(
            handles.iter().all(|handle| self.is_initialized(handle)),
            TallyError::NotInitialized
        );

        let request_id = self.next_request_id;
        self.next_request_id = request_id
            .checked_add(1)
            .ok_or(TallyError::ArithmeticOverflow)?;

        self.journal.push(EngineEvent::Queued(DecryptionQueued {
            request_id,
            handles: handles.to_vec(),
            callback: callback.to_vec(),
        }));
        Ok(request_id)
    }
}
