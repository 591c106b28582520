//! HTTP request handlers.

use crate::error::RpcError;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use sprint_consensus::{RecoveryInfo, Validator, Vote};
use sprint_messages::VoteBatchMessage;
use sprint_types::Address;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

/// Shared state for RPC handlers.
#[derive(Clone)]
pub struct RpcState {
    /// The validator core, behind the coarse lock that serialises handlers.
    pub validator: Arc<RwLock<Validator>>,
    /// Outbound queue the broadcaster drains. Votes are enqueued after the
    /// core accepts them; the HTTP response never waits for peer delivery.
    pub outbound: mpsc::Sender<Vote>,
    /// Server start time for uptime reporting.
    pub start_time: Instant,
}

impl RpcState {
    pub fn new(validator: Arc<RwLock<Validator>>, outbound: mpsc::Sender<Vote>) -> Self {
        Self {
            validator,
            outbound,
            start_time: Instant::now(),
        }
    }
}

/// Move freshly-cast votes from the core's outbox onto the broadcast queue.
/// Failures only mean the queue is full or the broadcaster is gone; both are
/// swallowed; broadcast is fire-and-forget.
fn forward_outbox(state: &RpcState, validator: &mut Validator) {
    for vote in validator.take_outbox() {
        if let Err(e) = state.outbound.try_send(vote) {
            debug!(error = %e, "dropping outbound vote; broadcast queue unavailable");
        }
    }
}

fn parse_address(raw: &str) -> Result<Address, RpcError> {
    if !sprint_crypto::validate_address(raw) {
        return Err(RpcError::InvalidRequest(format!(
            "malformed account address: {raw}"
        )));
    }
    Ok(Address::new(raw))
}

// ── Transaction ingress ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitTransactionRequest {
    /// Hex-encoded signed envelope bytes.
    pub raw: String,
}

#[derive(Serialize)]
pub struct SubmitTransactionResponse {
    /// This validator's self-vote for the accepted transaction.
    pub vote: Vote,
}

/// Handler for `POST /api/v1/transactions` (`send_raw_transaction`).
pub async fn submit_transaction_handler(
    State(state): State<RpcState>,
    Json(req): Json<SubmitTransactionRequest>,
) -> Result<impl IntoResponse, RpcError> {
    let raw = hex::decode(req.raw.trim())
        .map_err(|e| RpcError::InvalidRequest(format!("raw is not valid hex: {e}")))?;

    let mut validator = state.validator.write().await;
    let vote = validator.on_transaction(&raw)?;
    forward_outbox(&state, &mut validator);
    Ok(Json(SubmitTransactionResponse { vote }))
}

// ── Vote ingress ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct VoteAck {
    pub accepted: bool,
}

/// Handler for `POST /api/v1/votes` (`submit_vote`).
pub async fn submit_vote_handler(
    State(state): State<RpcState>,
    Json(vote): Json<Vote>,
) -> Result<impl IntoResponse, RpcError> {
    let mut validator = state.validator.write().await;
    validator.on_vote(vote)?;
    forward_outbox(&state, &mut validator);
    Ok(Json(VoteAck { accepted: true }))
}

#[derive(Serialize)]
pub struct VoteBatchAck {
    pub accepted: usize,
    pub rejected: usize,
}

/// Handler for `POST /api/v1/votes/batch` (`submit_votes`).
///
/// The batch is always acked; individual failures are counted and logged.
pub async fn submit_votes_handler(
    State(state): State<RpcState>,
    Json(msg): Json<VoteBatchMessage>,
) -> Result<impl IntoResponse, RpcError> {
    if !msg.header.is_current() {
        return Err(RpcError::InvalidRequest(format!(
            "unsupported protocol version {}",
            msg.header.protocol_version
        )));
    }

    let mut validator = state.validator.write().await;
    let results = validator.on_votes(msg.votes);
    forward_outbox(&state, &mut validator);

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results.len() - accepted;
    if rejected > 0 {
        debug!(accepted, rejected, "vote batch partially rejected");
    }
    Ok(Json(VoteBatchAck { accepted, rejected }))
}

// ── Account queries ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AccountInfoResponse {
    pub address: String,
    pub balance: String,
    pub nonce: u64,
    pub pending: bool,
    pub finalised: Option<u64>,
}

/// Handler for `GET /api/v1/accounts/{address}`.
pub async fn account_info_handler(
    State(state): State<RpcState>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, RpcError> {
    let addr = parse_address(&address)?;
    let validator = state.validator.read().await;
    let account = validator.account(&addr);
    Ok(Json(AccountInfoResponse {
        address,
        balance: account.balance.raw().to_string(),
        nonce: account.nonce,
        pending: account.pending,
        finalised: account.finalised,
    }))
}

#[derive(Serialize)]
pub struct RecoveryInfoResponse {
    #[serde(flatten)]
    pub info: RecoveryInfo,
}

/// Handler for `GET /api/v1/accounts/{address}/recovery`
/// (`get_recovery_info`).
pub async fn recovery_info_handler(
    State(state): State<RpcState>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, RpcError> {
    let addr = parse_address(&address)?;
    let validator = state.validator.read().await;
    let info = validator.recovery_info(&addr)?;
    Ok(Json(RecoveryInfoResponse { info }))
}

// ── Observability ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatusResponse {
    pub validator: String,
    pub validator_count: usize,
    pub fault_budget: usize,
    pub mode: String,
    pub finality_quorum: usize,
    pub notarisation_quorum: usize,
    pub accounts: usize,
    pub uptime_secs: u64,
}

/// Handler for `GET /api/v1/status`.
pub async fn status_handler(State(state): State<RpcState>) -> impl IntoResponse {
    let validator = state.validator.read().await;
    let params = validator.params();
    Json(StatusResponse {
        validator: validator.address().to_string(),
        validator_count: params.validator_count,
        fault_budget: params.fault_budget,
        mode: format!("{:?}", params.mode).to_lowercase(),
        finality_quorum: params.finality_quorum(),
        notarisation_quorum: params.notarisation_quorum(),
        accounts: validator.account_count(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Handler for `GET /health`, the liveness probe.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}
