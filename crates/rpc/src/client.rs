//! JSON-RPC client for the upstream ledger node

use gateway_common::{GatewayError, GatewayResult};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

pub struct UpstreamClient {
    rpc_url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl UpstreamClient {
    pub fn new(rpc_url: String, timeout: Duration) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::DependencyFailure(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            rpc_url,
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Send one call upstream.
    ///
    /// Transport and decoding problems are `DependencyFailure`; an error object
    /// returned by the node keeps its code and message.
    pub async fn call(&self, method: &str, params: Value) -> GatewayResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let params = if params.is_null() { Value::Array(Vec::new()) } else { params };
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id
        });

        debug!("upstream call {} (id {})", method, id);

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::DependencyFailure(format!("Request failed: {}", e)))?;

        let json: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::DependencyFailure(format!("Invalid response: {}", e)))?;

        if let Some(error) = json.get("error") {
            return Err(upstream_error(error));
        }

        Ok(json.get("result").cloned().unwrap_or(Value::Null))
    }
}

fn upstream_error(error: &Value) -> GatewayError {
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string());

    match error.get("code").and_then(Value::as_i64) {
        Some(code) => GatewayError::with_code(code, message),
        None => GatewayError::from(message),
    }
}
