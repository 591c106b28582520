//! HTTP RPC surface for a sprint validator.
//!
//! One axum router exposes transaction ingress, peer vote propagation, the
//! recovery-info snapshot and basic observability. Every ingress handler
//! returns before any peer broadcast happens: accepted votes are queued onto
//! an outbound channel the node's broadcaster drains.

mod error;
mod handlers;
mod routes;
mod server;

pub use error::RpcError;
pub use handlers::RpcState;
pub use routes::create_router;
pub use server::{RpcServer, RpcServerConfig, RpcServerError, RpcServerHandle};
