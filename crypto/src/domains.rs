//! Domain-separated signing digests.
//!
//! Every signature in the protocol covers a Blake2b digest prefixed with a
//! domain tag, so a signature produced for one purpose can never be replayed
//! as another.

use sprint_types::Address;

/// Domain tag for validator votes.
pub const DOMAIN_VOTE: &[u8] = b"sprint.vote.v1";

/// Domain tag for client transfer envelopes.
pub const DOMAIN_TRANSFER: &[u8] = b"sprint.transfer.v1";

/// Digest a vote signs: `(account, nonce, payload-hash-or-zero)` under the
/// vote domain. Bottom votes pass the zero hash.
pub fn vote_message(account: &Address, nonce: u64, payload_digest: &[u8; 32]) -> [u8; 32] {
    crate::blake2b_256_multi(&[
        DOMAIN_VOTE,
        account.as_str().as_bytes(),
        &nonce.to_le_bytes(),
        payload_digest,
    ])
}

/// Digest a client signs over the canonical transfer payload bytes.
pub fn transaction_message(payload_bytes: &[u8]) -> [u8; 32] {
    crate::blake2b_256_multi(&[DOMAIN_TRANSFER, payload_bytes])
}
