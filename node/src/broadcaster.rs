//! Fire-and-forget vote broadcast to peer validators.
//!
//! Ingress handlers never touch the network: accepted votes land on an
//! `mpsc` channel, and a detached task drains it, coalesces pending votes
//! into batches and POSTs one batch per peer. Delivery failures are logged
//! and dropped; peers that missed a batch recover through the normal vote
//! redundancy of the protocol.

use sprint_consensus::Vote;
use sprint_messages::VoteBatchMessage;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Maximum votes folded into one batch POST.
const MAX_BATCH: usize = 256;

/// Outcome of one broadcast round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BroadcastResult {
    /// Peers that accepted the batch.
    pub sent: usize,
    /// Peers that could not be reached or returned an error status.
    pub failed: usize,
}

/// Pushes vote batches to every configured peer.
pub struct PeerBroadcaster {
    peers: Vec<String>,
    client: reqwest::Client,
}

impl PeerBroadcaster {
    pub fn new(peers: Vec<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("reqwest client construction cannot fail with static options");
        Self { peers, client }
    }

    /// Drain the outbound queue until it closes. Each wakeup coalesces every
    /// immediately-available vote into one batch.
    pub async fn run(self, mut outbound: mpsc::Receiver<Vote>) {
        info!(peers = self.peers.len(), "peer broadcaster started");
        while let Some(first) = outbound.recv().await {
            let mut votes = vec![first];
            while votes.len() < MAX_BATCH {
                match outbound.try_recv() {
                    Ok(v) => votes.push(v),
                    Err(_) => break,
                }
            }
            let result = self.broadcast(VoteBatchMessage::new(votes)).await;
            if result.failed > 0 {
                debug!(sent = result.sent, failed = result.failed, "partial broadcast");
            }
        }
        info!("peer broadcaster stopped; outbound queue closed");
    }

    /// Send one batch to all peers concurrently.
    pub async fn broadcast(&self, batch: VoteBatchMessage) -> BroadcastResult {
        let mut result = BroadcastResult::default();
        let posts = self.peers.iter().map(|peer| {
            let url = format!("{}/api/v1/votes/batch", peer.trim_end_matches('/'));
            let client = self.client.clone();
            let batch = batch.clone();
            async move {
                match client.post(&url).json(&batch).send().await {
                    Ok(resp) if resp.status().is_success() => true,
                    Ok(resp) => {
                        debug!(peer = %url, status = %resp.status(), "peer rejected vote batch");
                        false
                    }
                    Err(e) => {
                        debug!(peer = %url, error = %e, "vote batch delivery failed");
                        false
                    }
                }
            }
        });
        for ok in futures::future::join_all(posts).await {
            if ok {
                result.sent += 1;
            } else {
                result.failed += 1;
            }
        }
        result
    }
}
