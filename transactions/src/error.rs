use thiserror::Error;

/// Errors from decoding or authenticating a transaction envelope.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TxError {
    #[error("transaction bytes do not decode: {0}")]
    Decode(String),

    #[error("transaction signature is invalid")]
    BadSignature,

    #[error("recovery data payload does not decode to a tip transaction")]
    MissingTip,
}
