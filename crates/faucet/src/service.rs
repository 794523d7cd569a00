//! Faucet service core logic

use super::config::FaucetConfig;
use super::database::{DispenseStore, DistributionRecord, FaucetStatistics};
use super::transfer::FundedTransfer;
use chrono::Utc;
use gateway_common::{Address, GatewayError, GatewayResult};
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// Faucet service
///
/// A dispense for one address holds a reservation from the cooldown check
/// until its timestamp is recorded, so two requests for the same address can
/// never both pass the check. Requests for different addresses never wait on
/// each other.
///
/// Transfer and record run detached from the caller: once the cooldown check
/// passes, dropping the request future does not stop the dispense or release
/// the address early.
pub struct FaucetService {
    config: FaucetConfig,
    database: Arc<dyn DispenseStore>,
    transfer: Arc<dyn FundedTransfer>,
    in_flight: Arc<Mutex<HashSet<String>>>,
    /// Last dispense per address (unix ms), kept even if the store write fails
    recent: Arc<Mutex<HashMap<String, i64>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|p| p.into_inner())
}

/// Releases the address reservation on every exit path
struct Reservation {
    in_flight: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for Reservation {
    fn drop(&mut self) {
        lock(&self.in_flight).remove(&self.key);
    }
}

impl FaucetService {
    /// Create new faucet service
    pub fn new(
        config: FaucetConfig,
        database: Arc<dyn DispenseStore>,
        transfer: Arc<dyn FundedTransfer>,
    ) -> Self {
        Self {
            config,
            database,
            transfer,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            recent: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &FaucetConfig {
        &self.config
    }

    /// Dispense tokens to an address and return the transaction hash
    pub async fn request_funds(&self, address: &str, ip_addr: Option<IpAddr>) -> GatewayResult<String> {
        // 1. Validate address; nothing else runs for a malformed one
        let address = Address::parse(address).map_err(|e| {
            debug!("Rejected faucet address {:?}: {}", address, e);
            GatewayError::InvalidInput("invalid address".to_string())
        })?;
        let key = address.to_lower_hex();
        let ip = ip_addr.map(|ip| ip.to_string()).unwrap_or_default();

        info!("Dispense request for address: {}, IP: {}", key, ip);

        // 2. Claim the address for the rest of the flow
        let reservation = self.reserve(&key)?;

        // 3. Check address cooldown
        self.check_address_cooldown(&key)?;

        // 4. Send funds and record, owning the reservation until done
        let transfer = self.transfer.clone();
        let database = self.database.clone();
        let recent = self.recent.clone();

        let dispense = tokio::spawn(async move {
            let _reservation = reservation;

            let tx_hash = transfer.transfer(&address).await.map_err(|e| {
                error!("Transfer to {} failed: {}", key, e);
                match e {
                    GatewayError::TransferFailed(_) => e,
                    other => GatewayError::TransferFailed(other.to_string()),
                }
            })?;

            let record = DistributionRecord::new(key.clone(), tx_hash.clone(), ip);
            lock(&recent).insert(key.clone(), record.timestamp);

            if let Err(e) = database.record_dispense(&record) {
                // Funds already left; report success so the caller does not retry
                error!("Dispensed to {} ({}) but failed to record it: {}", key, tx_hash, e);
            }

            info!("Successfully dispensed to {} at {}, tx: {}", key, record.datetime(), tx_hash);
            Ok::<_, GatewayError>(tx_hash)
        });

        match dispense.await {
            Ok(result) => result,
            Err(e) => {
                error!("Dispense task aborted: {}", e);
                Err(GatewayError::TransferFailed(e.to_string()))
            }
        }
    }

    fn reserve(&self, key: &str) -> GatewayResult<Reservation> {
        let mut in_flight = lock(&self.in_flight);
        if !in_flight.insert(key.to_string()) {
            warn!("Dispense for {} already in flight", key);
            return Err(GatewayError::CooldownActive {
                remaining_secs: self.config.cooldown_secs,
            });
        }

        Ok(Reservation {
            in_flight: self.in_flight.clone(),
            key: key.to_string(),
        })
    }

    /// Check address cooldown against both the store and recent dispenses
    fn check_address_cooldown(&self, key: &str) -> GatewayResult<()> {
        let remembered = lock(&self.recent).get(key).copied();
        let stored = self.database.last_dispense_at(key)?;

        if let Some(last_dispense) = remembered.max(stored) {
            let elapsed = Utc::now().timestamp_millis() - last_dispense;
            let cooldown = self.config.cooldown_duration().as_millis() as i64;

            if elapsed < cooldown {
                let remaining = ((cooldown - elapsed) as u64).div_ceil(1000);
                warn!("Address {} requested too soon. Remaining: {}s", key, remaining);
                return Err(GatewayError::CooldownActive {
                    remaining_secs: remaining,
                });
            }
        }

        Ok(())
    }

    pub fn statistics(&self) -> FaucetStatistics {
        self.database.get_statistics()
    }

    /// Prune distribution history past the configured retention
    pub fn cleanup_old_records(&self) -> GatewayResult<usize> {
        let cutoff = Utc::now().timestamp_millis() - self.config.cooldown_duration().as_millis() as i64;
        lock(&self.recent).retain(|_, last| *last >= cutoff);

        self.database.cleanup_old_records(self.config.retention_days)
    }
}
