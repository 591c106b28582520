//! Validation error taxonomy.

use sprint_types::{Address, Amount};
use thiserror::Error;

/// Why a transaction or vote was rejected at ingress.
///
/// A rejection never mutates any account field.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed or unverifiable signature")]
    BadSignature,

    #[error("vote signer {0} is not in the validator set")]
    NotInValidatorSet(Address),

    #[error("account {0} already has a vote in flight at its current nonce")]
    Pending(Address),

    #[error("transaction nonce {got} does not match account nonce {expected}")]
    NonceMismatch { expected: u64, got: u64 },

    #[error("previous nonce has not finalised")]
    NotFinalisedPrev,

    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    #[error("invalid recovery transaction: {0}")]
    InvalidRecovery(#[from] RecoveryFault),
}

/// The specific way a recovery transaction failed validation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecoveryFault {
    #[error("data payload does not decode to a valid tip transaction")]
    MissingTip,

    #[error("tip sender does not match the recovery sender")]
    TipSenderMismatch,

    #[error("no notarisation certificate for the tip at nonce {0}")]
    TipNotNotarised(u64),

    #[error("nonce {0} between tip and recovery has no bottom notarisation")]
    IntermediateNotBottom(u64),

    #[error("recovery chain exceeds the maximum depth")]
    RecursionTooDeep,
}
