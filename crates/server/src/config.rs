use anyhow::{Context, Result};
use gateway_common::utils::logging::LoggingConfig;
use gateway_faucet::FaucetConfig;
use gateway_rpc::UpstreamConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Top-level gateway configuration; every section is optional in the file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Listen address
    #[serde(default = "default_server_addr")]
    pub server_addr: String,

    /// Maximum accepted request body
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,

    /// Allow any origin, method and header
    #[serde(default = "default_cors_enabled")]
    pub cors_enabled: bool,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub faucet: FaucetConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub tasks: TaskConfig,
}

/// Hash mapping store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub db_path: String,

    #[serde(default = "default_hash_tree")]
    pub hash_tree: String,
}

/// Background jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    /// How often faucet history is pruned (seconds)
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server_addr: default_server_addr(),
            body_limit_bytes: default_body_limit_bytes(),
            cors_enabled: default_cors_enabled(),
            logging: LoggingConfig::default(),
            upstream: UpstreamConfig::default(),
            faucet: FaucetConfig::default(),
            storage: StorageConfig::default(),
            tasks: TaskConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_storage_path(),
            hash_tree: default_hash_tree(),
        }
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

fn default_server_addr() -> String { "0.0.0.0:3000".to_string() }
fn default_body_limit_bytes() -> usize { 10 * 1024 * 1024 }
fn default_cors_enabled() -> bool { true }
fn default_storage_path() -> String { "./data/move_hash".to_string() }
fn default_hash_tree() -> String { gateway_storage::DEFAULT_TREE.to_string() }
fn default_cleanup_interval_secs() -> u64 { 86400 }

impl GatewayConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.server_addr
            .parse()
            .with_context(|| format!("Invalid server address: {}", self.server_addr))
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.tasks.cleanup_interval_secs)
    }

    /// Fail fast on values that would only break once traffic arrives
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        if self.body_limit_bytes == 0 {
            anyhow::bail!("body_limit_bytes must be positive");
        }
        if self.tasks.cleanup_interval_secs == 0 {
            anyhow::bail!("cleanup_interval_secs must be positive");
        }
        self.faucet.validate().context("Invalid faucet configuration")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.body_limit_bytes, 10 * 1024 * 1024);
        assert_eq!(config.faucet.cooldown_secs, 600);
        assert!(config.cors_enabled);
    }

    #[test]
    fn test_partial_document() {
        let config: GatewayConfig = serde_json::from_value(serde_json::json!({
            "server_addr": "127.0.0.1:8080",
            "faucet": { "cooldown_secs": 60 },
            "upstream": { "chain_id": 30732 }
        }))
        .unwrap();

        assert_eq!(config.socket_addr().unwrap().port(), 8080);
        assert_eq!(config.faucet.cooldown_secs, 60);
        assert_eq!(config.faucet.retention_days, 30);
        assert_eq!(config.upstream.chain_id, Some(30732));
        assert!(!config.upstream.forwarded_methods.is_empty());
    }

    #[test]
    fn test_invalid_addr_rejected() {
        let config = GatewayConfig {
            server_addr: "nowhere".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
