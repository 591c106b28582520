//! Per-address account state.

use sprint_types::{Address, Amount};
use std::collections::HashMap;

/// The mutable state a validator keeps for one account.
///
/// Invariants (checked by tests, maintained by the certificate processor):
/// `finalised < nonce` always; both are monotonically non-decreasing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Account {
    /// Spendable balance in raw units.
    pub balance: Amount,
    /// Next nonce this validator will vote for.
    pub nonce: u64,
    /// A vote has been cast at `nonce` but the nonce has not yet advanced.
    pub pending: bool,
    /// Highest nonce whose payment effect has been applied. `None` until the
    /// first payment commits.
    pub finalised: Option<u64>,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            balance: Amount::ZERO,
            nonce: 0,
            pending: false,
            finalised: None,
        }
    }
}

impl Account {
    /// The nonce the next directly-finalised payment must carry.
    pub fn next_unfinalised_nonce(&self) -> u64 {
        self.finalised.map_or(0, |f| f + 1)
    }
}

/// In-memory store of all accounts known to this validator.
///
/// Accounts are created lazily with default state on first reference and
/// persist for the lifetime of the process.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: HashMap<Address, Account>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an account, defaulting if it has never been touched.
    pub fn get(&self, addr: &Address) -> Account {
        self.accounts.get(addr).copied().unwrap_or_default()
    }

    /// Mutable access, auto-creating with defaults and zero balance.
    pub fn get_mut(&mut self, addr: &Address) -> &mut Account {
        self.accounts.entry(addr.clone()).or_default()
    }

    /// Seed balances from a genesis allocation.
    pub fn seed_genesis(&mut self, allocations: &[(Address, Amount)]) {
        for (addr, balance) in allocations {
            self.get_mut(addr).balance = *balance;
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
