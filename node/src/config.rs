//! Node configuration with TOML file support.

use crate::NodeError;
use serde::{Deserialize, Serialize};
use sprint_types::Mode;

/// One genesis balance allocation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenesisEntry {
    pub address: String,
    pub balance: u128,
}

/// Configuration for a sprint validator node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Byzantine budget `f`.
    #[serde(default = "default_fault_budget")]
    pub fault_budget: usize,

    /// Quorum rule variant.
    #[serde(default)]
    pub mode: Mode,

    /// Hex-encoded 32-byte Ed25519 seed for the validator signing key.
    pub validator_seed: String,

    /// Addresses of all validators in the deployment (this node included).
    /// `n` is the length of this list.
    pub validators: Vec<String>,

    /// Base URLs of the other validators' RPC endpoints, e.g.
    /// `http://10.0.0.2:7210`.
    #[serde(default)]
    pub peers: Vec<String>,

    /// Genesis balance allocations.
    #[serde(default)]
    pub genesis: Vec<GenesisEntry>,

    /// RPC listen port.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_fault_budget() -> usize {
    1
}

fn default_rpc_port() -> u16 {
    7210
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("NodeConfig is always serialisable to TOML")
    }

    /// Decode the validator seed into key material.
    pub fn seed_bytes(&self) -> Result<[u8; 32], NodeError> {
        let bytes = hex::decode(self.validator_seed.trim())
            .map_err(|e| NodeError::Config(format!("validator_seed is not valid hex: {e}")))?;
        bytes
            .try_into()
            .map_err(|_| NodeError::Config("validator_seed must be 32 bytes".into()))
    }
}
