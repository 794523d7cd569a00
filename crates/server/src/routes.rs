//! HTTP surface: JSON-RPC endpoint, faucet and hash lookup

use crate::config::GatewayConfig;
use crate::lookup::HashLookupController;
use axum::{
    extract::{DefaultBodyLimit, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use gateway_common::utils::client_ip::ClientIp;
use gateway_faucet::api::{faucet_handler, SuccessResponse};
use gateway_faucet::FaucetService;
use gateway_rpc::{CallContext, RequestLogger};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
struct RpcState {
    rpc: Arc<RequestLogger>,
    lookup: Arc<HashLookupController>,
}

#[derive(Debug, Default, Deserialize)]
struct MoveHashQuery {
    hash: Option<String>,
}

pub fn build_router(
    rpc: Arc<RequestLogger>,
    faucet: Arc<FaucetService>,
    lookup: Arc<HashLookupController>,
    config: &GatewayConfig,
) -> Router {
    let faucet_routes = Router::new()
        .route("/v1/eth_faucet", get(faucet_handler))
        .with_state(faucet);

    let mut app = Router::new()
        .route("/", post(rpc_handler))
        .route("/v1", post(rpc_handler))
        .route("/v1/move_hash", get(move_hash_handler))
        .with_state(RpcState { rpc, lookup })
        .merge(faucet_routes)
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(TraceLayer::new_for_http());

    if config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        app = app.layer(cors);
        info!("CORS enabled");
    }

    app
}

/// Single or batch JSON-RPC; notification-only payloads get 204
async fn rpc_handler(State(state): State<RpcState>, ip: ClientIp, Json(payload): Json<Value>) -> Response {
    match state.rpc.handle(payload, CallContext::new(ip.0)).await {
        Some(reply) => Json(reply).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn move_hash_handler(State(state): State<RpcState>, Query(query): Query<MoveHashQuery>) -> Response {
    match state.lookup.lookup(query.hash.as_deref()).await {
        Ok(mapped) => Json(SuccessResponse { data: mapped }).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "internal error" })),
        )
            .into_response(),
    }
}
