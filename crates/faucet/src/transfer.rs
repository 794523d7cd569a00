//! Funded-transfer primitive

use async_trait::async_trait;
use gateway_common::{Address, GatewayError, GatewayResult};
use gateway_rpc::UpstreamClient;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Sends faucet funds to an address and returns the transaction hash
#[async_trait]
pub trait FundedTransfer: Send + Sync {
    async fn transfer(&self, to: &Address) -> GatewayResult<String>;
}

/// Submits `eth_sendTransaction` from an account the ledger node manages.
/// The node builds and signs the transaction.
pub struct LedgerTransfer {
    client: Arc<UpstreamClient>,
    from: Address,
    amount_wei: u128,
}

impl LedgerTransfer {
    pub fn new(client: Arc<UpstreamClient>, from: Address, amount_wei: u128) -> Self {
        info!("Faucet account: {}, dispensing {} wei per request", from, amount_wei);
        Self {
            client,
            from,
            amount_wei,
        }
    }

    fn request(&self, to: &Address) -> Value {
        json!([{
            "from": self.from.to_lower_hex(),
            "to": to.to_lower_hex(),
            "value": format!("0x{:x}", self.amount_wei),
        }])
    }
}

#[async_trait]
impl FundedTransfer for LedgerTransfer {
    async fn transfer(&self, to: &Address) -> GatewayResult<String> {
        let result = self
            .client
            .call("eth_sendTransaction", self.request(to))
            .await
            .map_err(|e| GatewayError::TransferFailed(e.message()))?;

        match result {
            Value::String(tx_hash) if !tx_hash.is_empty() => Ok(tx_hash),
            other => Err(GatewayError::TransferFailed(format!(
                "unexpected eth_sendTransaction result: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use std::time::Duration;

    async fn spawn_node(reply: Value) -> Arc<UpstreamClient> {
        let app = Router::new().route(
            "/",
            post(move |Json(req): Json<Value>| {
                let mut reply = reply.clone();
                async move {
                    assert_eq!(req["method"], "eth_sendTransaction");
                    reply["id"] = req["id"].clone();
                    Json(reply)
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Arc::new(UpstreamClient::new(format!("http://{}", addr), Duration::from_secs(5)).unwrap())
    }

    fn to() -> Address {
        Address::parse("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap()
    }

    #[test]
    fn test_request_shape() {
        let client = Arc::new(UpstreamClient::new("http://127.0.0.1:1".into(), Duration::from_secs(1)).unwrap());
        let transfer = LedgerTransfer::new(client, Address::default(), 1_000_000_000_000_000_000);
        let request = transfer.request(&to());
        assert_eq!(request[0]["from"], "0x0000000000000000000000000000000000000000");
        assert_eq!(request[0]["to"], "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
        assert_eq!(request[0]["value"], "0xde0b6b3a7640000");
    }

    #[tokio::test]
    async fn test_transfer_returns_hash() {
        let client = spawn_node(json!({"jsonrpc": "2.0", "result": "0xfeed"})).await;
        let transfer = LedgerTransfer::new(client, Address::default(), 1);
        assert_eq!(transfer.transfer(&to()).await.unwrap(), "0xfeed");
    }

    #[tokio::test]
    async fn test_ledger_rejection_is_transfer_failure() {
        let client = spawn_node(json!({
            "jsonrpc": "2.0",
            "error": {"code": -32000, "message": "insufficient funds for transfer"}
        }))
        .await;
        let transfer = LedgerTransfer::new(client, Address::default(), 1);
        let err = transfer.transfer(&to()).await.unwrap_err();
        assert_eq!(err, GatewayError::TransferFailed("insufficient funds for transfer".into()));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transfer_failure() {
        let client = Arc::new(UpstreamClient::new("http://127.0.0.1:1".into(), Duration::from_secs(1)).unwrap());
        let transfer = LedgerTransfer::new(client, Address::default(), 1);
        assert!(matches!(
            transfer.transfer(&to()).await,
            Err(GatewayError::TransferFailed(_))
        ));
    }
}
