//! The static validator set.

use crate::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The fixed, ordered set of validator addresses for this deployment.
///
/// Membership is checked on every peer vote; the order is only used for
/// deterministic iteration (status output, tests).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ValidatorSet {
    members: Vec<Address>,
    #[serde(skip)]
    index: HashSet<Address>,
}

impl ValidatorSet {
    pub fn new(mut members: Vec<Address>) -> Self {
        members.sort();
        members.dedup();
        let index = members.iter().cloned().collect();
        Self { members, index }
    }

    pub fn contains(&self, addr: &Address) -> bool {
        // The index is skipped by serde; fall back to the list after a
        // deserialisation that left it empty.
        if self.index.is_empty() {
            self.members.contains(addr)
        } else {
            self.index.contains(addr)
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.members.iter()
    }
}
