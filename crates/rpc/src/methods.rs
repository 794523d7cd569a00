//! Method set served by the gateway binary

use crate::client::UpstreamClient;
use crate::config::UpstreamConfig;
use crate::registry::{handler_fn, CallContext, MethodRegistry, RegistryError, RpcHandler};
use async_trait::async_trait;
use gateway_common::GatewayResult;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

pub const CLIENT_VERSION: &str = concat!("evm-gateway/", env!("CARGO_PKG_VERSION"));

/// Relays a call to the ledger node under the same method name
pub struct ForwardHandler {
    method: String,
    client: Arc<UpstreamClient>,
}

impl ForwardHandler {
    pub fn new(method: impl Into<String>, client: Arc<UpstreamClient>) -> Self {
        Self {
            method: method.into(),
            client,
        }
    }
}

#[async_trait]
impl RpcHandler for ForwardHandler {
    async fn call(&self, params: Value, _ctx: CallContext) -> GatewayResult<Value> {
        self.client.call(&self.method, params).await
    }
}

/// Local methods first, then one relay per configured name.
/// A relay name that collides with a local method is skipped.
pub fn build_registry(
    config: &UpstreamConfig,
    client: Arc<UpstreamClient>,
) -> Result<MethodRegistry, RegistryError> {
    let mut builder = MethodRegistry::builder().register(
        "web3_clientVersion",
        handler_fn(|_, _| async { Ok(json!(CLIENT_VERSION)) }),
    )?;

    match config.chain_id {
        Some(chain_id) => {
            builder = builder
                .register(
                    "eth_chainId",
                    handler_fn(move |_, _| async move { Ok(json!(format!("0x{:x}", chain_id))) }),
                )?
                .register(
                    "net_version",
                    handler_fn(move |_, _| async move { Ok(json!(chain_id.to_string())) }),
                )?;
        }
        None => {
            for method in ["eth_chainId", "net_version"] {
                if !config.forwarded_methods.iter().any(|m| m == method) {
                    builder = builder.register(method, Arc::new(ForwardHandler::new(method, client.clone())))?;
                }
            }
        }
    }

    for method in &config.forwarded_methods {
        if builder.contains(method) {
            warn!("{} is served locally, not relaying it upstream", method);
            continue;
        }
        builder = builder.register(method.clone(), Arc::new(ForwardHandler::new(method.clone(), client.clone())))?;
    }

    let registry = builder.build();
    info!("Registered {} JSON-RPC methods", registry.len());
    Ok(registry)
}
