use anchor_lang::prelude::*;

#[error_code]
pub enum TallyError {
    #[msg("Caller is not the owner")]
    NotOwner,
    #[msg("Caller is not a provider")]
    NotProvider,
    #[msg("The program is paused")]
    PausedState,
    #[msg("Cooldown period has not elapsed")]
    CooldownActive,
    #[msg("Batch does not exist or is not open")]
    InvalidBatch,
    #[msg("Batch is not in the required lifecycle state")]
    BatchNotOpen,
    #[msg("Decryption request has already been processed")]
    ReplayDetected,
    #[msg("Ciphertext state changed since the decryption request")]
    StateMismatch,
    #[msg("Decryption proof is invalid")]
    InvalidProof,
    #[msg("Ciphertext handle is not initialized")]
    NotInitialized,
    #[msg("Cleartext blob does not match the catalog layout")]
    MalformedCleartexts,
    #[msg("Accumulator account does not match the catalog entry")]
    AccumulatorMismatch,
    #[msg("Provider set is full")]
    ProviderCapacityReached,
    #[msg("Cooldown must not be negative")]
    InvalidCooldown,
    #[msg("Engine issued an unexpected request id")]
    RequestIdMismatch,
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
}
