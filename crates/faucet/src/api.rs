//! HTTP API for faucet service

use super::error::FaucetRejection;
use super::service::FaucetService;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use gateway_common::utils::client_ip::ClientIp;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Query of `GET /v1/eth_faucet`
#[derive(Debug, Default, Deserialize)]
pub struct FaucetQuery {
    pub address: Option<String>,
}

/// Success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub data: T,
}

/// Dispense handler
pub async fn faucet_handler(
    State(service): State<Arc<FaucetService>>,
    ip: ClientIp,
    Query(query): Query<FaucetQuery>,
) -> Response {
    let address = query.address.unwrap_or_default();

    match service.request_funds(&address, ip.0).await {
        Ok(tx_hash) => Json(SuccessResponse { data: tx_hash }).into_response(),
        Err(e) => {
            if e.is_client_error() {
                info!("Faucet request from {} refused: {}", ip, e);
            } else {
                warn!("Faucet request from {} failed: {}", ip, e);
            }
            FaucetRejection(e).into_response()
        }
    }
}
