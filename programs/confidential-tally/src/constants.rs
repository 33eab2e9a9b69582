// PDA seeds
pub const REGISTRY_SEED: &[u8] = b"registry";
pub const BATCH_SEED: &[u8] = b"batch";
pub const ACCUMULATOR_SEED: &[u8] = b"accumulator";
pub const ASSET_DIMENSION_SEED: &[u8] = b"asset";
pub const TYPE_DIMENSION_SEED: &[u8] = b"type";
pub const COOLDOWN_SEED: &[u8] = b"cooldown";
pub const DECRYPTION_SEED: &[u8] = b"decryption";

/// Upper bound on the provider set stored inline in the registry account.
pub const MAX_PROVIDERS: usize = 16;

/// Upper bound on catalog entries per dimension, sizes the published counts.
pub const MAX_CATALOG_ITEMS: usize = 8;

/// First batch id, opened by `initialize`.
pub const FIRST_BATCH_ID: u64 = 1;

/// First request id handed out by the on-chain engine.
pub const FIRST_REQUEST_ID: u64 = 1;

/// Ciphertext type tag carried in the last byte of every computed handle (euint32).
pub const HANDLE_TYPE_EUINT32: u8 = 4;

// Domain separation tags for the hashes the program computes
pub const STATE_HASH_TAG: &[u8] = b"confidential-tally/state-hash";
pub const DECRYPTION_DIGEST_TAG: &[u8] = b"confidential-tally/decryption";
pub const OP_ADD_TAG: &[u8] = b"confidential-tally/fhe-add";
pub const OP_TRIVIAL_TAG: &[u8] = b"confidential-tally/fhe-trivial";
