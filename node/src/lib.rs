//! Validator node wiring: configuration, the RPC server and the
//! fire-and-forget peer broadcaster.

pub mod broadcaster;
pub mod config;
pub mod error;
pub mod node;

pub use broadcaster::{BroadcastResult, PeerBroadcaster};
pub use config::{GenesisEntry, NodeConfig};
pub use error::NodeError;
pub use node::SprintNode;
