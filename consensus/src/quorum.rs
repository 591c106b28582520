//! Quorum evaluation over a slot's vote bag.

use crate::vote::{Vote, VotePayload};
use serde::{Deserialize, Serialize};
use sprint_types::Address;
use std::collections::{HashMap, HashSet};

/// Result of evaluating one `(account, nonce)` slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuorumSummary {
    /// The payload with the highest distinct-validator count, with that
    /// count. `None` on an empty slot. Ties break deterministically towards
    /// the greatest payload (transactions above ⊥, then bytewise by hash).
    pub leader: Option<(VotePayload, usize)>,
    /// Distinct validators that have voted anything in the slot.
    pub total_voters: usize,
}

impl QuorumSummary {
    /// The leading payload's count, zero on an empty slot.
    pub fn leader_count(&self) -> usize {
        self.leader.map(|(_, c)| c).unwrap_or(0)
    }
}

/// A set of votes sharing `(account, nonce, payload)` that reached a
/// threshold. Certificates are derived views over the vote store, never
/// primary records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub account: Address,
    pub nonce: u64,
    pub payload: VotePayload,
    pub votes: Vec<Vote>,
}

impl Certificate {
    pub fn signer_count(&self) -> usize {
        self.votes.len()
    }
}

/// Partition a slot's votes by payload and pick the leader.
///
/// The store guarantees per-validator dedup, so within one payload every
/// vote carries a distinct voter.
pub fn evaluate(votes: &[Vote]) -> QuorumSummary {
    let mut counts: HashMap<VotePayload, usize> = HashMap::new();
    let mut voters: HashSet<&Address> = HashSet::new();
    for v in votes {
        *counts.entry(v.payload).or_insert(0) += 1;
        voters.insert(&v.voter);
    }
    let leader = counts
        .into_iter()
        .max_by_key(|(payload, count)| (*count, *payload));
    QuorumSummary {
        leader,
        total_voters: voters.len(),
    }
}

/// Build the certificate for `payload` if it has at least `threshold`
/// distinct votes in the slot.
pub fn certificate(votes: &[Vote], payload: VotePayload, threshold: usize) -> Option<Certificate> {
    let members: Vec<Vote> = votes
        .iter()
        .filter(|v| v.payload == payload)
        .cloned()
        .collect();
    if members.len() < threshold {
        return None;
    }
    let first = members.first()?;
    Some(Certificate {
        account: first.account.clone(),
        nonce: first.nonce,
        payload,
        votes: members,
    })
}

/// Certificate for the leading payload if the leader meets `threshold`.
pub fn leading_certificate(votes: &[Vote], threshold: usize) -> Option<Certificate> {
    let summary = evaluate(votes);
    let (payload, count) = summary.leader?;
    if count < threshold {
        return None;
    }
    certificate(votes, payload, threshold)
}
