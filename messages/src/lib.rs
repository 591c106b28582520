//! Message types for validator-to-validator communication.

use serde::{Deserialize, Serialize};
use sprint_consensus::Vote;

/// Wire protocol version. Peers reject messages from other versions.
pub const PROTOCOL_VERSION: u16 = 1;

/// Header present on every peer message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    pub protocol_version: u16,
}

impl MessageHeader {
    pub fn current() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
        }
    }

    pub fn is_current(&self) -> bool {
        self.protocol_version == PROTOCOL_VERSION
    }
}

impl Default for MessageHeader {
    fn default() -> Self {
        Self::current()
    }
}

/// A batch of votes pushed to a peer. Fire-and-forget: the sender never
/// waits for the outcome.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoteBatchMessage {
    pub header: MessageHeader,
    pub votes: Vec<Vote>,
}

impl VoteBatchMessage {
    pub fn new(votes: Vec<Vote>) -> Self {
        Self {
            header: MessageHeader::current(),
            votes,
        }
    }
}
