use sprint_types::ParamsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid protocol parameters: {0}")]
    Params(#[from] ParamsError),

    #[error("RPC server error: {0}")]
    Rpc(#[from] sprint_rpc::RpcServerError),
}
