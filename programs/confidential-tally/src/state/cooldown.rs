use anchor_lang::prelude::*;

use crate::error::TallyError;

/// Which rate-limited entry point an actor is using. Each kind has its own window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Submission,
    DecryptionRequest,
}

/// Last gated action timestamps of one actor.
#[account]
#[derive(InitSpace, Default, Debug, PartialEq, Eq)]
pub struct Cooldown {
    pub actor: Pubkey,
    pub last_submission_at: Option<i64>,
    pub last_request_at: Option<i64>,
    pub bump: u8,
}

impl Cooldown {
    fn last(&self, kind: ActionKind) -> Option<i64> {
        match kind {
            ActionKind::Submission => self.last_submission_at,
            ActionKind::DecryptionRequest => self.last_request_at,
        }
    }

    /// Fails while `now` is still inside the window opened by the last action of `kind`.
    pub fn check(&self, kind: ActionKind, now: i64, cooldown_seconds: i64) -> Result<()> {
        if let Some(last) = self.last(kind) {
            let ready_at = last.saturating_add(cooldown_seconds);
            require!(now >= ready_at, TallyError::CooldownActive);
        }
        Ok(())
    }

    /// Must only be called once the gated action has succeeded.
    pub fn record(&mut self, kind: ActionKind, now: i64) {
        match kind {
            ActionKind::Submission => self.last_submission_at = Some(now),
            ActionKind::DecryptionRequest => self.last_request_at = Some(now),
        }
    }
}
