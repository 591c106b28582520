//! Cryptographic primitives for the sprint protocol.
//!
//! - **Ed25519** for transaction and vote signatures
//! - **Blake2b-256** for content-address hashing
//! - Domain-separated signing digests for votes and transfers
//! - Address derivation with `sprt_` prefix and base32 encoding

pub mod address;
pub mod domains;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::{decode_address, derive_address, validate_address};
pub use domains::{transaction_message, vote_message, DOMAIN_TRANSFER, DOMAIN_VOTE};
pub use hash::{blake2b_256, blake2b_256_multi, hash_transaction};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
