//! Recovery-chain resolution and recovery-info snapshots.

use crate::error::RecoveryFault;
use crate::quorum::Certificate;
use serde::{Deserialize, Serialize};
use sprint_transactions::{Transaction, TxKind};
use sprint_types::{Address, TxHash};
use thiserror::Error;

/// Maximum number of recovery layers an envelope may nest. Each inner layer
/// has a strictly lower nonce than its parent, so honest chains are short;
/// the cap bounds adversarial input.
pub const MAX_RECOVERY_DEPTH: usize = 8;

/// Walk a transaction's tip pointers down to the original payment whose
/// effects the chain commits.
///
/// A payment is its own chain start. A recovery unwraps its embedded tip,
/// which may itself be a recovery; unwrapping beyond
/// [`MAX_RECOVERY_DEPTH`] layers fails with `RecursionTooDeep`.
pub fn chain_start(
    tx: &Transaction,
    recovery_address: &Address,
) -> Result<Transaction, RecoveryFault> {
    let mut current = tx.clone();
    for _ in 0..=MAX_RECOVERY_DEPTH {
        match current
            .kind(Some(recovery_address))
            .map_err(|_| RecoveryFault::MissingTip)?
        {
            TxKind::Payment => return Ok(current),
            TxKind::Recovery { tip } => current = *tip,
        }
    }
    Err(RecoveryFault::RecursionTooDeep)
}

/// Failure while assembling a recovery-info snapshot.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// `account.nonce` advanced past a nonce for which the local store holds
    /// no notarisation certificate, an internal invariant violation. Fatal
    /// for the snapshot call, non-fatal for the validator.
    #[error("no notarisation certificate stored for nonce {0}")]
    MissingNotarisation(u64),
}

/// Everything a client needs to craft a recovery transaction: the last
/// finalised payment with its finality certificate, and one notarisation
/// certificate per intervening nonce up to the account's current nonce.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecoveryInfo {
    /// Highest finalised nonce, if any payment has committed.
    pub finalised_nonce: Option<u64>,
    /// Content hash of the transaction finalised at `finalised_nonce`.
    pub finalised_tx: Option<TxHash>,
    /// The `n − f` certificate for the finalised transaction.
    pub finality_certificate: Option<Certificate>,
    /// The account's current nonce.
    pub current_nonce: u64,
    /// One notarisation certificate (transaction or ⊥) for every nonce
    /// strictly between `finalised_nonce` and `current_nonce`, ascending.
    pub chain: Vec<Certificate>,
}

impl RecoveryInfo {
    /// The client-side tip choice: the latest non-⊥ certified transaction in
    /// the chain, falling back to the finalised transaction when every
    /// intervening nonce went to ⊥.
    pub fn suggested_tip(&self) -> Option<TxHash> {
        self.chain
            .iter()
            .rev()
            .find_map(|c| c.payload.tx_hash())
            .or(self.finalised_tx)
    }
}
