//! Validator state machine and recovery protocol.
//!
//! Each account is an independent state machine driven by votes. A signed
//! transfer entering through [`Validator::on_transaction`] produces a
//! self-vote; peer votes enter through [`Validator::on_vote`]. Every vote
//! insertion re-evaluates the account's current nonce against two quorum
//! thresholds:
//!
//! - **notarisation** (`n − 3f` distinct voters on one payload) lets the
//!   nonce advance,
//! - **finality** (`n − f` distinct voters on one payload) commits the
//!   payment.
//!
//! When a client equivocates and no payload can reach notarisation, the
//! bottom (⊥) voting rule breaks the lock: once `n − f` distinct voters are
//! seen without any payload at notarisation, the validator casts ⊥ for the
//! nonce, and a ⊥ notarisation frees the account. A later recovery
//! transaction re-anchors `finalised` to the last committed payment.

pub mod account;
pub mod error;
pub mod quorum;
pub mod recovery;
pub mod validator;
pub mod vote;
pub mod vote_store;

pub use account::{Account, AccountStore};
pub use error::{RecoveryFault, ValidationError};
pub use quorum::{Certificate, QuorumSummary};
pub use recovery::{chain_start, RecoveryInfo, SnapshotError, MAX_RECOVERY_DEPTH};
pub use validator::Validator;
pub use vote::{Vote, VotePayload};
pub use vote_store::VoteStore;
