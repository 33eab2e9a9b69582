use anchor_lang::prelude::*;

#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct OwnershipTransferred {
    pub previous_owner: Pubkey,
    pub new_owner: Pubkey,
}

#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct ProviderAdded {
    pub provider: Pubkey,
}

#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct ProviderRemoved {
    pub provider: Pubkey,
}

#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct Paused {
    pub account: Pubkey,
}

#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct Unpaused {
    pub account: Pubkey,
}

#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct CooldownChanged {
    pub old_seconds: i64,
    pub new_seconds: i64,
}

#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct KmsSignerChanged {
    pub previous: Pubkey,
    pub current: Pubkey,
}

#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct BatchOpened {
    pub batch_id: u64,
    pub start_time: i64,
}

#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct BatchClosed {
    pub batch_id: u64,
    pub end_time: i64,
}

/// Carries identifying metadata only, never the weight handle.
#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct VoteSubmitted {
    pub provider: Pubkey,
    pub batch_id: u64,
    pub asset_id: u32,
    pub type_id: u32,
}

#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct DecryptionRequested {
    pub request_id: u64,
    pub batch_id: u64,
    pub state_hash: [u8; 32],
}

#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct DecryptionCompleted {
    pub request_id: u64,
    pub batch_id: u64,
    pub asset_counts: Vec<u32>,
    pub type_counts: Vec<u32>,
}

/// Emitted for the off-chain coprocessor so it can materialize `result`.
#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct HandleComputed {
    pub op: u8,
    pub lhs: [u8; 32],
    pub rhs: [u8; 32],
    pub result: [u8; 32],
}

/// Work item for the decryption oracle.
#[event]
#[derive(Debug, PartialEq, Eq)]
pub struct DecryptionQueued {
    pub request_id: u64,
    pub handles: Vec<[u8; 32]>,
    pub callback: Vec<u8>,
}
