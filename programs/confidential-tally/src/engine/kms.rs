use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};
use solana_instructions_sysvar::{load_current_index_checked, load_instruction_at_checked};
use solana_sdk_ids::ed25519_program;

use crate::{catalog::decryption_digest, engine::ProofVerifier};

const SIGNATURE_LEN: usize = 64;
const PUBKEY_LEN: usize = 32;
// num_signatures (u8) + padding (u8)
const OFFSETS_START: usize = 2;
const THIS_INSTRUCTION: u16 = u16::MAX;

/// One signature record of an Ed25519 program instruction, as the native
/// program reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Ed25519SignatureOffsets {
    pub signature_offset: u16,
    pub signature_instruction_index: u16,
    pub public_key_offset: u16,
    pub public_key_instruction_index: u16,
    pub message_data_offset: u16,
    pub message_data_size: u16,
    pub message_instruction_index: u16,
}

const OFFSETS_LEN: usize = std::mem::size_of::<Ed25519SignatureOffsets>();

impl Ed25519SignatureOffsets {
    fn read(data: &[u8]) -> Option<Self> {
        let record = data.get(OFFSETS_START..OFFSETS_START + OFFSETS_LEN)?;
        bytemuck::try_pod_read_unaligned(record).ok()
    }

    fn is_self_contained(&self) -> bool {
        [
            self.signature_instruction_index,
            self.public_key_instruction_index,
            self.message_instruction_index,
        ]
        .iter()
        .all(|ix| *ix == THIS_INSTRUCTION)
    }
}

/// Accepts a decryption result when the instruction right before the callback
/// is an Ed25519 native-program check of the KMS signature over
/// [`decryption_digest`].
///
/// The native program has already rejected the transaction if the signature
/// does not verify; what remains to check here is that it attests to the
/// configured signer, this exact digest and the signature passed as proof.
pub struct KmsSignatureVerifier<'a, 'info> {
    pub instructions_sysvar: &'a AccountInfo<'info>,
    pub signer: Pubkey,
    pub domain: Pubkey,
}

impl ProofVerifier for KmsSignatureVerifier<'_, '_> {
    fn verify(&self, request_id: u64, cleartexts: &[u8], proof: &[u8]) -> Result<bool> {
        let Ok(signature) = <[u8; SIGNATURE_LEN]>::try_from(proof) else {
            return Ok(false);
        };

        let current = load_current_index_checked(self.instructions_sysvar)?;
        if current == 0 {
            return Ok(false);
        }
        let previous = load_instruction_at_checked(
            usize::from(current - 1),
            self.instructions_sysvar,
        )?;
        if previous.program_id != ed25519_program::ID {
            return Ok(false);
        }

        let message = decryption_digest(&self.domain, request_id, cleartexts);
        Ok(ed25519_instruction_attests(
            &previous.data,
            &self.signer,
            &message,
            &signature,
        ))
    }
}

fn slice_at(data: &[u8], offset: u16, len: usize) -> Option<&[u8]> {
    let start = usize::from(offset);
    data.get(start..start.checked_add(len)?)
}

/// Whether Ed25519 program instruction `data` carries exactly one signature
/// record, self-contained, over `message` by `signer` with `signature`.
pub fn ed25519_instruction_attests(
    data: &[u8],
    signer: &Pubkey,
    message: &[u8],
    signature: &[u8; SIGNATURE_LEN],
) -> bool {
    if data.first() != Some(&1) {
        return false;
    }
    let Some(offsets) = Ed25519SignatureOffsets::read(data) else {
        return false;
    };
    if !offsets.is_self_contained() || usize::from(offsets.message_data_size) != message.len() {
        return false;
    }

    slice_at(data, offsets.signature_offset, SIGNATURE_LEN) == Some(signature.as_slice())
        && slice_at(data, offsets.public_key_offset, PUBKEY_LEN) == Some(&signer.to_bytes()[..])
        && slice_at(data, offsets.message_data_offset, message.len()) == Some(message)
}
