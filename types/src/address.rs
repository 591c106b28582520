//! Account addresses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of the recovery contract: the sentinel recipient that marks a
/// transaction as a recovery rather than a payment. It is not derived from
/// any key; no funds can ever be spent from it.
const RECOVERY_SENTINEL: &str = "sprt_recovery";

/// A public-key-derived account address (`sprt_` prefix, base32 body with
/// checksum, see `sprint_crypto::derive_address`).
///
/// Stored as its canonical string form. The sentinel recovery address is the
/// only address that does not correspond to a key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fixed sentinel recipient for recovery transactions.
    pub fn recovery_sentinel() -> Self {
        Self(RECOVERY_SENTINEL.to_string())
    }

    pub fn is_recovery_sentinel(&self) -> bool {
        self.0 == RECOVERY_SENTINEL
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}
