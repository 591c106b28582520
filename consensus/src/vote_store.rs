//! Per-`(account, nonce)` vote storage.
//!
//! Votes are appended and never mutated or evicted. Deduplication enforces
//! the single-tx-vote invariant: a validator gets at most one transaction
//! vote and at most one ⊥ vote per slot, and the first transaction vote
//! binds: a second transaction vote from the same validator (equivocation
//! relayed through that validator) is dropped.

use crate::vote::{Vote, VotePayload};
use sprint_types::Address;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
struct Slot {
    votes: Vec<Vote>,
    /// Validators that have a transaction vote in this slot.
    tx_voters: HashSet<Address>,
    /// Validators that have a ⊥ vote in this slot.
    bottom_voters: HashSet<Address>,
}

/// Bag of votes per `(account, nonce)` slot.
#[derive(Debug, Default)]
pub struct VoteStore {
    slots: HashMap<(Address, u64), Slot>,
}

impl VoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vote, subject to the deduplication rules.
    ///
    /// Returns `true` if the vote was stored, `false` if it was dropped:
    /// - a transaction vote is dropped when the validator already has *any*
    ///   vote in the slot (the first one binds);
    /// - a ⊥ vote is dropped only when the validator already has a ⊥ vote
    ///   (a validator may hold one transaction vote and one ⊥ vote).
    pub fn insert(&mut self, vote: Vote) -> bool {
        let slot = self
            .slots
            .entry((vote.account.clone(), vote.nonce))
            .or_default();

        match vote.payload {
            VotePayload::Transaction(_) => {
                if slot.tx_voters.contains(&vote.voter)
                    || slot.bottom_voters.contains(&vote.voter)
                {
                    return false;
                }
                slot.tx_voters.insert(vote.voter.clone());
            }
            VotePayload::Bottom => {
                if slot.bottom_voters.contains(&vote.voter) {
                    return false;
                }
                slot.bottom_voters.insert(vote.voter.clone());
            }
        }
        slot.votes.push(vote);
        true
    }

    /// All votes stored at a slot, in arrival order.
    pub fn votes(&self, account: &Address, nonce: u64) -> &[Vote] {
        self.slots
            .get(&(account.clone(), nonce))
            .map(|s| s.votes.as_slice())
            .unwrap_or(&[])
    }

    /// Distinct-validator count for one payload at a slot.
    pub fn count_distinct(&self, account: &Address, nonce: u64, payload: &VotePayload) -> usize {
        self.votes(account, nonce)
            .iter()
            .filter(|v| &v.payload == payload)
            .count()
    }

    /// Distinct validators that have voted anything at a slot.
    pub fn distinct_voters(&self, account: &Address, nonce: u64) -> usize {
        self.slots
            .get(&(account.clone(), nonce))
            .map(|s| s.tx_voters.union(&s.bottom_voters).count())
            .unwrap_or(0)
    }

    /// Whether `voter` has a ⊥ vote at the slot.
    pub fn has_bottom_vote(&self, account: &Address, nonce: u64, voter: &Address) -> bool {
        self.slots
            .get(&(account.clone(), nonce))
            .map(|s| s.bottom_voters.contains(voter))
            .unwrap_or(false)
    }
}
