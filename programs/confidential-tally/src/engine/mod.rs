//! Boundary to the external encryption engine.
//!
//! The program never sees plaintext. It manipulates 32-byte ciphertext
//! handles through [`FheEngine`] and trusts decryption results only when a
//! [`ProofVerifier`] accepts them. Processing functions are generic over both
//! traits; instruction handlers plug in [`SymbolicEngine`] and
//! [`KmsSignatureVerifier`].

use anchor_lang::prelude::*;

pub mod kms;
pub mod symbolic;

pub use kms::*;
pub use symbolic::*;

/// Opaque identifier of a ciphertext held by the coprocessor.
pub type Handle = [u8; 32];

/// Handle value of storage that was never written.
pub const UNINITIALIZED_HANDLE: Handle = [0; 32];

pub trait FheEngine {
    fn is_initialized(&self, handle: &Handle) -> bool;

    /// Encrypted constant, used to establish a zero accumulator.
    fn trivial_encrypt(&mut self, value: u32) -> Result<Handle>;

    /// Homomorphic addition of two encrypted `u32` values.
    fn add(&mut self, lhs: &Handle, rhs: &Handle) -> Result<Handle>;

    /// Hands `handles` to the decryption oracle and returns the request id the
    /// oracle will answer through the instruction identified by `callback`.
    fn request_decryption(&mut self, handles: &[Handle], callback: &[u8]) -> Result<u64>;
}

pub trait ProofVerifier {
    fn verify(&self, request_id: u64, cleartexts: &[u8], proof: &[u8]) -> Result<bool>;
}
