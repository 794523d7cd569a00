//! Faucet configuration

use anyhow::{bail, Context, Result};
use gateway_common::Address;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Faucet service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaucetConfig {
    /// Cooldown period between dispenses to the same address (seconds)
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Funded account the ledger node sends from
    #[serde(default = "default_faucet_address")]
    pub faucet_address: String,

    /// Amount to dispense per request (in wei)
    #[serde(default = "default_dispense_amount")]
    pub dispense_amount: String,

    /// Database path
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Distribution history older than this is pruned (days)
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            faucet_address: default_faucet_address(),
            dispense_amount: default_dispense_amount(),
            db_path: default_db_path(),
            retention_days: default_retention_days(),
        }
    }
}

fn default_cooldown_secs() -> u64 { 600 } // 10 minutes
fn default_faucet_address() -> String { "0x0000000000000000000000000000000000000000".to_string() }
fn default_dispense_amount() -> String { "1000000000000000000".to_string() } // 1 ETH
fn default_db_path() -> String { "./data/faucet".to_string() }
fn default_retention_days() -> i64 { 30 }

impl FaucetConfig {
    /// Get address cooldown duration
    pub fn cooldown_duration(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn dispense_amount_wei(&self) -> Result<u128> {
        self.dispense_amount
            .parse::<u128>()
            .with_context(|| format!("Invalid dispense amount: {}", self.dispense_amount))
    }

    pub fn faucet_address(&self) -> Result<Address> {
        Address::parse(&self.faucet_address)
            .with_context(|| format!("Invalid faucet address: {}", self.faucet_address))
    }

    pub fn validate(&self) -> Result<()> {
        if self.cooldown_secs == 0 {
            bail!("faucet cooldown must be positive");
        }
        if self.retention_days <= 0 {
            bail!("faucet retention_days must be positive");
        }
        self.dispense_amount_wei()?;
        self.faucet_address()?;
        Ok(())
    }
}
