//! Client-side envelope assembly.
//!
//! The validator core never builds transactions; these helpers exist for
//! wallets, tooling and the test suites.

use crate::Transaction;
use sprint_types::{Address, Amount, KeyPair, Signature};

/// Build and sign a payment envelope.
pub fn build_payment(signer: &KeyPair, recipient: Address, amount: Amount, nonce: u64) -> Transaction {
    sign_envelope(signer, recipient, amount, nonce, Vec::new())
}

/// Build and sign a recovery envelope whose data payload carries `tip`.
///
/// The recovery itself moves no value; the tip's transfer is the economic
/// effect committed when the recovery finalises.
pub fn build_recovery(
    signer: &KeyPair,
    recovery_address: &Address,
    nonce: u64,
    tip: &Transaction,
) -> Transaction {
    sign_envelope(
        signer,
        recovery_address.clone(),
        Amount::ZERO,
        nonce,
        tip.encode(),
    )
}

fn sign_envelope(
    signer: &KeyPair,
    recipient: Address,
    amount: Amount,
    nonce: u64,
    data: Vec<u8>,
) -> Transaction {
    let mut tx = Transaction {
        recipient,
        amount,
        nonce,
        data,
        public_key: signer.public,
        signature: Signature([0u8; 64]),
    };
    let digest = sprint_crypto::transaction_message(&tx.payload_bytes());
    tx.signature = sprint_crypto::sign_message(&digest, &signer.private);
    tx
}
