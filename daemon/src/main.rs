//! sprint daemon — entry point for running a validator node.

use clap::Parser;
use sprint_node::{NodeConfig, SprintNode};

#[derive(Parser)]
#[command(name = "sprint-daemon", about = "sprint payment protocol validator daemon")]
struct Cli {
    /// Path to a TOML configuration file. Required: it carries the validator
    /// set, signing seed and genesis allocation. CLI flags override file
    /// values.
    #[arg(long, env = "SPRINT_CONFIG")]
    config: String,

    /// RPC server port (overrides the config file).
    #[arg(long, env = "SPRINT_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Byzantine budget f (overrides the config file).
    #[arg(long, env = "SPRINT_FAULT_BUDGET")]
    fault_budget: Option<usize>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "SPRINT_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = NodeConfig::from_toml_file(&cli.config)?;
    if let Some(port) = cli.rpc_port {
        config.rpc_port = port;
    }
    if let Some(f) = cli.fault_budget {
        config.fault_budget = f;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    sprint_utils::init_tracing(&config.log_level);

    // Configuration failures (undersized validator set, malformed seed,
    // local key outside the set) abort before anything binds.
    let mut node = SprintNode::new(config)?;
    let addr = node.start().await?;
    tracing::info!(rpc = %addr, "sprint validator running");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received — stopping node");
    node.stop().await;
    tracing::info!("sprint daemon exited cleanly");

    Ok(())
}
