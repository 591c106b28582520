//! RPC server lifecycle.

use crate::handlers::RpcState;
use crate::routes::create_router;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Errors from the RPC server.
#[derive(Debug, Error)]
pub enum RpcServerError {
    #[error("failed to bind RPC listener: {0}")]
    Bind(#[from] std::io::Error),
}

/// Configuration for the RPC server.
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    /// Address to listen on.
    pub listen_addr: SocketAddr,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 7210)),
        }
    }
}

/// Handle for a running RPC server.
pub struct RpcServerHandle {
    task: JoinHandle<()>,
    local_addr: SocketAddr,
}

impl RpcServerHandle {
    /// The address the listener actually bound (relevant with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Abort the server task.
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Wait for the server task to finish.
    pub async fn join(self) -> Result<(), tokio::task::JoinError> {
        self.task.await
    }
}

/// The validator-facing HTTP server.
pub struct RpcServer {
    config: RpcServerConfig,
    state: RpcState,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, state: RpcState) -> Self {
        Self { config, state }
    }

    /// Bind and start serving; returns a handle for control.
    pub async fn start(self) -> Result<RpcServerHandle, RpcServerError> {
        let listener = tokio::net::TcpListener::bind(self.config.listen_addr).await?;
        let local_addr = listener.local_addr()?;
        info!(addr = %local_addr, "RPC server listening");

        let router = create_router(self.state);
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                error!(error = ?e, "RPC server terminated");
            }
        });

        Ok(RpcServerHandle { task, local_addr })
    }
}
