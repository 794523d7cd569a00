use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upstream ledger node and the methods relayed to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// JSON-RPC endpoint of the ledger node
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Answer `eth_chainId` / `net_version` locally when set
    #[serde(default)]
    pub chain_id: Option<u64>,

    /// Methods relayed verbatim to the ledger node
    #[serde(default = "default_forwarded_methods")]
    pub forwarded_methods: Vec<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            timeout_secs: default_timeout_secs(),
            chain_id: None,
            forwarded_methods: default_forwarded_methods(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_rpc_url() -> String { "http://127.0.0.1:8545".to_string() }
fn default_timeout_secs() -> u64 { 30 }

fn default_forwarded_methods() -> Vec<String> {
    [
        "eth_blockNumber",
        "eth_getBalance",
        "eth_getBlockByHash",
        "eth_getBlockByNumber",
        "eth_getBlockTransactionCountByHash",
        "eth_getBlockTransactionCountByNumber",
        "eth_getCode",
        "eth_getStorageAt",
        "eth_getTransactionCount",
        "eth_getTransactionByHash",
        "eth_getTransactionReceipt",
        "eth_getLogs",
        "eth_call",
        "eth_estimateGas",
        "eth_gasPrice",
        "eth_maxPriorityFeePerGas",
        "eth_feeHistory",
        "eth_sendRawTransaction",
        "eth_syncing",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
