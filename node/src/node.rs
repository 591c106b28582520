//! Node assembly: validator core + RPC server + broadcaster.

use crate::broadcaster::PeerBroadcaster;
use crate::config::NodeConfig;
use crate::error::NodeError;
use sprint_consensus::Validator;
use sprint_rpc::{RpcServer, RpcServerConfig, RpcServerHandle, RpcState};
use sprint_types::{Address, Amount, ProtocolParams, ValidatorSet};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::info;

/// Depth of the outbound vote queue between ingress and the broadcaster.
const OUTBOUND_QUEUE: usize = 4096;

/// A running sprint validator node.
pub struct SprintNode {
    validator: Arc<RwLock<Validator>>,
    rpc_handle: Option<RpcServerHandle>,
    broadcaster_task: Option<tokio::task::JoinHandle<()>>,
    config: NodeConfig,
}

impl SprintNode {
    /// Build the validator core from configuration.
    ///
    /// Fails when the parameters violate the fault model, the seed is
    /// malformed, or the derived local address is not in the validator set.
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let seed = config.seed_bytes()?;
        let keypair = sprint_crypto::keypair_from_seed(&seed);

        let members: Vec<Address> = config
            .validators
            .iter()
            .map(|s| Address::new(s.clone()))
            .collect();
        let set = ValidatorSet::new(members);

        let params = ProtocolParams::new(config.fault_budget, set.len(), config.mode);
        let mut validator = Validator::new(params, set, keypair)?;
        if !validator
            .validator_set()
            .contains(validator.address())
        {
            return Err(NodeError::Config(format!(
                "local validator address {} is not in the configured validator set",
                validator.address()
            )));
        }

        let genesis: Vec<(Address, Amount)> = config
            .genesis
            .iter()
            .map(|g| (Address::new(g.address.clone()), Amount::new(g.balance)))
            .collect();
        validator.seed_genesis(&genesis);
        info!(
            address = %validator.address(),
            n = validator.params().validator_count,
            f = validator.params().fault_budget,
            mode = ?validator.params().mode,
            genesis_accounts = genesis.len(),
            "validator core initialised"
        );

        Ok(Self {
            validator: Arc::new(RwLock::new(validator)),
            rpc_handle: None,
            broadcaster_task: None,
            config,
        })
    }

    /// Shared handle to the validator core (used by tests and tooling).
    pub fn validator(&self) -> Arc<RwLock<Validator>> {
        self.validator.clone()
    }

    /// Start the RPC server and the peer broadcaster.
    pub async fn start(&mut self) -> Result<SocketAddr, NodeError> {
        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_QUEUE);

        let broadcaster = PeerBroadcaster::new(self.config.peers.clone());
        self.broadcaster_task = Some(tokio::spawn(broadcaster.run(outbound_rx)));

        let state = RpcState::new(self.validator.clone(), outbound_tx);
        let rpc = RpcServer::new(
            RpcServerConfig {
                listen_addr: SocketAddr::from(([0, 0, 0, 0], self.config.rpc_port)),
            },
            state,
        );
        let handle = rpc.start().await?;
        let addr = handle.local_addr();
        self.rpc_handle = Some(handle);
        Ok(addr)
    }

    /// Stop the RPC server and broadcaster.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.rpc_handle.take() {
            handle.abort();
        }
        if let Some(task) = self.broadcaster_task.take() {
            task.abort();
        }
        info!("node stopped");
    }
}
