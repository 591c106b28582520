//! Validator votes.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use sprint_types::{Address, KeyPair, PublicKey, Signature, TxHash, ValidatorSet};

/// What a vote endorses at an `(account, nonce)` slot: a specific
/// transaction, or the bottom sentinel ⊥ meaning "this nonce carries no
/// transaction".
///
/// The derived ordering (⊥ below every transaction hash, hashes bytewise)
/// gives the quorum evaluator a deterministic tie-break; only threshold
/// comparisons are safety-relevant.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum VotePayload {
    /// ⊥, cast to break an equivocation lock.
    Bottom,
    /// Endorsement of the transaction with this content hash.
    Transaction(TxHash),
}

impl VotePayload {
    /// The 32 bytes folded into the vote digest: the transaction hash, or
    /// the zero hash for ⊥.
    pub fn digest_bytes(&self) -> [u8; 32] {
        match self {
            VotePayload::Bottom => [0u8; 32],
            VotePayload::Transaction(h) => *h.as_bytes(),
        }
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, VotePayload::Bottom)
    }

    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            VotePayload::Bottom => None,
            VotePayload::Transaction(h) => Some(*h),
        }
    }
}

/// A validator's vote for a payload at an `(account, nonce)` slot.
///
/// Immutable once constructed. The signature covers the domain-separated
/// digest of `(account, nonce, payload)`, never the voter field, which is
/// instead bound by being derived from the embedded public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Address of the voting validator.
    pub voter: Address,
    /// The account this vote concerns.
    pub account: Address,
    /// The nonce slot within the account.
    pub nonce: u64,
    /// Endorsed payload.
    pub payload: VotePayload,
    /// The voter's public key.
    pub public_key: PublicKey,
    /// Ed25519 signature over the vote digest.
    pub signature: Signature,
}

impl Vote {
    /// Construct and sign a vote with the local validator key.
    pub fn signed(
        keypair: &KeyPair,
        account: Address,
        nonce: u64,
        payload: VotePayload,
    ) -> Self {
        let voter = sprint_crypto::derive_address(&keypair.public);
        let digest = sprint_crypto::vote_message(&account, nonce, &payload.digest_bytes());
        let signature = sprint_crypto::sign_message(&digest, &keypair.private);
        Self {
            voter,
            account,
            nonce,
            payload,
            public_key: keypair.public,
            signature,
        }
    }

    /// Verify a peer vote: the signature must check out over the recomputed
    /// digest, the embedded key must derive the claimed voter address, and
    /// that address must be in the validator set.
    ///
    /// Self-generated votes bypass this (the local signer is trusted for its
    /// own material).
    pub fn verify(&self, validators: &ValidatorSet) -> Result<(), ValidationError> {
        if sprint_crypto::derive_address(&self.public_key) != self.voter {
            return Err(ValidationError::BadSignature);
        }
        if !validators.contains(&self.voter) {
            return Err(ValidationError::NotInValidatorSet(self.voter.clone()));
        }
        let digest =
            sprint_crypto::vote_message(&self.account, self.nonce, &self.payload.digest_bytes());
        if !sprint_crypto::verify_signature(&digest, &self.signature, &self.public_key) {
            return Err(ValidationError::BadSignature);
        }
        Ok(())
    }
}
