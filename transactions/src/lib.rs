//! Signed transfer envelopes.
//!
//! A transaction is an opaque, deterministically-serialised envelope:
//! recipient, amount, nonce, data payload, the signer's public key and an
//! Ed25519 signature over a domain-separated digest of the payload. The rest
//! of the system consumes only two derived properties: the content hash and
//! the recovered sender address.
//!
//! A transaction whose recipient is the recovery sentinel carries a
//! serialised inner transaction (the "tip") in its data payload.

mod builder;
mod error;

pub use builder::{build_payment, build_recovery};
pub use error::TxError;

use serde::{Deserialize, Serialize};
use sprint_types::{Address, Amount, PublicKey, Signature, TxHash};

/// A signed transfer envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Recipient address; the recovery sentinel marks a recovery.
    pub recipient: Address,
    /// Transfer amount in raw units.
    pub amount: Amount,
    /// Account nonce this transfer occupies.
    pub nonce: u64,
    /// Opaque data payload. For recoveries: the bincode-encoded tip.
    pub data: Vec<u8>,
    /// The signer's public key; the sender address derives from it.
    pub public_key: PublicKey,
    /// Ed25519 signature over the domain-separated payload digest.
    pub signature: Signature,
}

/// The two shapes a transaction can take, decoded on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxKind {
    /// An ordinary transfer to a key-derived recipient.
    Payment,
    /// A recovery pointing at an inner tip transaction.
    Recovery { tip: Box<Transaction> },
}

impl Transaction {
    /// Canonical bytes covered by the signature (everything but the
    /// signature itself).
    pub fn payload_bytes(&self) -> Vec<u8> {
        #[derive(Serialize)]
        struct Payload<'a> {
            recipient: &'a Address,
            amount: &'a Amount,
            nonce: u64,
            data: &'a [u8],
            public_key: &'a PublicKey,
        }
        bincode::serialize(&Payload {
            recipient: &self.recipient,
            amount: &self.amount,
            nonce: self.nonce,
            data: &self.data,
            public_key: &self.public_key,
        })
        .expect("payload is always serialisable")
    }

    /// Deterministic wire encoding of the full envelope.
    pub fn encode(&self) -> Vec<u8> {
        bincode::serialize(self).expect("transaction is always serialisable")
    }

    /// Decode an envelope from wire bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, TxError> {
        bincode::deserialize(bytes).map_err(|e| TxError::Decode(e.to_string()))
    }

    /// Content address of this transaction. Equality is by this hash.
    pub fn hash(&self) -> TxHash {
        sprint_crypto::hash_transaction(&self.encode())
    }

    /// Verify the signature and return the sender address derived from the
    /// embedded public key.
    pub fn sender(&self) -> Result<Address, TxError> {
        let digest = sprint_crypto::transaction_message(&self.payload_bytes());
        if !sprint_crypto::verify_signature(&digest, &self.signature, &self.public_key) {
            return Err(TxError::BadSignature);
        }
        Ok(sprint_crypto::derive_address(&self.public_key))
    }

    /// Classify the envelope, decoding the tip for recoveries.
    ///
    /// `recovery_address` is the configured sentinel; in classic mode no
    /// sentinel exists and every transaction is a payment.
    pub fn kind(&self, recovery_address: Option<&Address>) -> Result<TxKind, TxError> {
        match recovery_address {
            Some(sentinel) if &self.recipient == sentinel => {
                let tip = Transaction::decode(&self.data)
                    .map_err(|_| TxError::MissingTip)?;
                Ok(TxKind::Recovery { tip: Box::new(tip) })
            }
            _ => Ok(TxKind::Payment),
        }
    }

    /// Whether this envelope addresses the recovery sentinel.
    pub fn is_recovery(&self, recovery_address: &Address) -> bool {
        &self.recipient == recovery_address
    }
}
