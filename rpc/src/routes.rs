//! Route configuration for the RPC API.

use crate::handlers::*;
use axum::routing::{get, post};
use axum::Router;

/// Create the full router with all RPC routes.
pub fn create_router(state: RpcState) -> Router {
    Router::new()
        // Liveness probe (no prefix)
        .route("/health", get(health_handler))
        // API v1 routes
        .nest("/api/v1", api_v1_routes())
        .with_state(state)
}

fn api_v1_routes() -> Router<RpcState> {
    Router::new()
        .route("/status", get(status_handler))
        // Transaction ingress
        .route("/transactions", post(submit_transaction_handler))
        // Peer vote propagation
        .route("/votes", post(submit_vote_handler))
        .route("/votes/batch", post(submit_votes_handler))
        // Account queries
        .route("/accounts/{address}", get(account_info_handler))
        .route("/accounts/{address}/recovery", get(recovery_info_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use sprint_consensus::Validator;
    use sprint_crypto::{derive_address, keypair_from_seed};
    use sprint_transactions::build_payment;
    use sprint_types::{Address, Amount, KeyPair, Mode, ProtocolParams, ValidatorSet};
    use std::sync::Arc;
    use tokio::sync::{mpsc, RwLock};
    use tower::ServiceExt;

    fn client_key() -> KeyPair {
        keypair_from_seed(&[100u8; 32])
    }

    fn test_state() -> (RpcState, mpsc::Receiver<sprint_consensus::Vote>) {
        let keys: Vec<KeyPair> = (0..6).map(|i| keypair_from_seed(&[i + 1; 32])).collect();
        let set = ValidatorSet::new(keys.iter().map(|k| derive_address(&k.public)).collect());
        let mut validator = Validator::new(
            ProtocolParams::new(1, 6, Mode::Recovery),
            set,
            keypair_from_seed(&[1u8; 32]),
        )
        .unwrap();
        validator.seed_genesis(&[(
            derive_address(&client_key().public),
            Amount::new(1000),
        )]);

        let (tx, rx) = mpsc::channel(64);
        (RpcState::new(Arc::new(RwLock::new(validator)), tx), rx)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (state, _rx) = test_state();
        let app = create_router(state);
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn status_reports_parameters() {
        let (state, _rx) = test_state();
        let app = create_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["validator_count"], 6);
        assert_eq!(json["finality_quorum"], 5);
        assert_eq!(json["notarisation_quorum"], 3);
        assert_eq!(json["mode"], "recovery");
    }

    #[tokio::test]
    async fn submitted_transaction_returns_vote_and_queues_broadcast() {
        let (state, mut rx) = test_state();
        let app = create_router(state);

        let tx = build_payment(
            &client_key(),
            Address::new("sprt_recipient"),
            Amount::new(100),
            0,
        );
        let body = serde_json::json!({ "raw": hex::encode(tx.encode()) });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/transactions")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["vote"]["nonce"], 0);

        // The self-vote is queued for broadcast without waiting for peers.
        let queued = rx.try_recv().unwrap();
        assert_eq!(queued.nonce, 0);
    }

    #[tokio::test]
    async fn bad_hex_is_rejected() {
        let (state, _rx) = test_state();
        let app = create_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/transactions")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"raw": "not-hex"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "invalid_request");
    }

    #[tokio::test]
    async fn nonce_mismatch_maps_to_conflict() {
        let (state, _rx) = test_state();
        let app = create_router(state);
        let tx = build_payment(
            &client_key(),
            Address::new("sprt_recipient"),
            Amount::new(100),
            7,
        );
        let body = serde_json::json!({ "raw": hex::encode(tx.encode()) });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/transactions")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["error"], "nonce_mismatch");
    }

    #[tokio::test]
    async fn account_info_for_valid_address() {
        let (state, _rx) = test_state();
        let app = create_router(state);
        let addr = derive_address(&client_key().public);
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/accounts/{addr}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["balance"], "1000");
        assert_eq!(json["nonce"], 0);
        assert_eq!(json["pending"], false);
    }

    #[tokio::test]
    async fn malformed_address_is_rejected() {
        let (state, _rx) = test_state();
        let app = create_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/accounts/not-an-address")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn recovery_info_for_fresh_account() {
        let (state, _rx) = test_state();
        let app = create_router(state);
        let addr = derive_address(&client_key().public);
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/accounts/{addr}/recovery"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["current_nonce"], 0);
        assert!(json["chain"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn vote_batch_acks_with_counts() {
        let (state, _rx) = test_state();
        let app = create_router(state);

        let peer = keypair_from_seed(&[2u8; 32]);
        let vote = sprint_consensus::Vote::signed(
            &peer,
            derive_address(&client_key().public),
            0,
            sprint_consensus::VotePayload::Bottom,
        );
        let msg = sprint_messages::VoteBatchMessage::new(vec![vote]);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/votes/batch")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&msg).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["accepted"], 1);
        assert_eq!(json["rejected"], 0);
    }
}
