//! Faucet database for tracking distributions

use chrono::{DateTime, Utc};
use gateway_common::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};
use sled::{Db, IVec, Tree};
use tracing::{debug, info};

/// Distribution record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionRecord {
    /// Recipient address, lowercase
    pub address: String,
    /// Transaction hash
    pub tx_hash: String,
    /// Dispense time, unix milliseconds
    pub timestamp: i64,
    /// Caller IP address
    pub ip_address: String,
}

impl DistributionRecord {
    pub fn new(address: String, tx_hash: String, ip_address: String) -> Self {
        Self {
            address,
            tx_hash,
            timestamp: Utc::now().timestamp_millis(),
            ip_address,
        }
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_else(Utc::now)
    }

    fn key(&self) -> String {
        // Zero-padded so keys for one address sort by time
        format!("{}:{:020}", self.address, self.timestamp)
    }
}

fn db_error(err: sled::Error) -> GatewayError {
    GatewayError::DependencyFailure(format!("Database error: {}", err))
}

fn codec_error(err: bincode::Error) -> GatewayError {
    GatewayError::DependencyFailure(format!("Corrupt distribution record: {}", err))
}

/// Faucet database
pub struct FaucetDatabase {
    db: Db,
    /// Tree for distribution records
    distributions: Tree,
    /// Tree for address tracking (last dispense time); never pruned
    address_tracker: Tree,
}

impl FaucetDatabase {
    /// Create or open faucet database
    pub fn new(path: &str) -> GatewayResult<Self> {
        info!("Opening faucet database at: {}", path);

        let db = sled::Config::default()
            .path(path)
            .cache_capacity(64 * 1024 * 1024) // 64MB cache
            .open()
            .map_err(db_error)?;

        Self::from_db(db)
    }

    /// In-memory database, gone when dropped
    pub fn temporary() -> GatewayResult<Self> {
        let db = sled::Config::new().temporary(true).open().map_err(db_error)?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> GatewayResult<Self> {
        let distributions = db.open_tree("distributions").map_err(db_error)?;
        let address_tracker = db.open_tree("address_tracker").map_err(db_error)?;

        Ok(Self {
            db,
            distributions,
            address_tracker,
        })
    }

    /// Record a successful dispense and move the address's cooldown start
    pub fn record_dispense(&self, record: &DistributionRecord) -> GatewayResult<()> {
        let value = bincode::serialize(record).map_err(codec_error)?;

        self.distributions
            .insert(record.key(), value)
            .map_err(db_error)?;

        self.address_tracker
            .insert(
                record.address.as_bytes(),
                IVec::from(record.timestamp.to_be_bytes().as_slice()),
            )
            .map_err(db_error)?;

        debug!("Recorded distribution for address: {}", record.address);

        Ok(())
    }

    /// Get last dispense timestamp (unix ms) for an address
    pub fn last_dispense_at(&self, address: &str) -> GatewayResult<Option<i64>> {
        match self.address_tracker.get(address.as_bytes()).map_err(db_error)? {
            Some(bytes) => {
                let timestamp = i64::from_be_bytes(bytes.as_ref().try_into().map_err(|_| {
                    GatewayError::DependencyFailure("Invalid timestamp format".to_string())
                })?);
                Ok(Some(timestamp))
            }
            None => Ok(None),
        }
    }

    /// Get all distributions for an address, newest first
    pub fn distributions_for(&self, address: &str) -> GatewayResult<Vec<DistributionRecord>> {
        let mut records = Vec::new();

        for item in self.distributions.scan_prefix(format!("{}:", address)) {
            let (_, value) = item.map_err(db_error)?;
            records.push(bincode::deserialize::<DistributionRecord>(&value).map_err(codec_error)?);
        }

        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }

    /// Get statistics
    pub fn get_statistics(&self) -> FaucetStatistics {
        FaucetStatistics {
            total_distributions: self.distributions.len(),
            unique_addresses: self.address_tracker.len(),
        }
    }

    /// Prune distribution history older than `days`. Cooldown state is kept.
    pub fn cleanup_old_records(&self, days: i64) -> GatewayResult<usize> {
        let cutoff = Utc::now().timestamp_millis() - days * 86_400_000;
        let mut keys_to_remove = Vec::new();

        for item in self.distributions.iter() {
            let (key, value) = item.map_err(db_error)?;
            let record: DistributionRecord = bincode::deserialize(&value).map_err(codec_error)?;

            if record.timestamp < cutoff {
                keys_to_remove.push(key);
            }
        }

        for key in &keys_to_remove {
            self.distributions.remove(key).map_err(db_error)?;
        }

        info!("Cleaned up {} old records (older than {} days)", keys_to_remove.len(), days);
        Ok(keys_to_remove.len())
    }

    pub async fn flush(&self) -> GatewayResult<()> {
        self.db.flush_async().await.map_err(db_error)?;
        Ok(())
    }
}

/// Faucet statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaucetStatistics {
    pub total_distributions: usize,
    pub unique_addresses: usize,
}

/// What the faucet flow needs from distribution storage
pub trait DispenseStore: Send + Sync {
    fn record_dispense(&self, record: &DistributionRecord) -> GatewayResult<()>;
    fn last_dispense_at(&self, address: &str) -> GatewayResult<Option<i64>>;
    fn get_statistics(&self) -> FaucetStatistics;
    fn cleanup_old_records(&self, days: i64) -> GatewayResult<usize>;
}

impl DispenseStore for FaucetDatabase {
    fn record_dispense(&self, record: &DistributionRecord) -> GatewayResult<()> {
        FaucetDatabase::record_dispense(self, record)
    }

    fn last_dispense_at(&self, address: &str) -> GatewayResult<Option<i64>> {
        FaucetDatabase::last_dispense_at(self, address)
    }

    fn get_statistics(&self) -> FaucetStatistics {
        FaucetDatabase::get_statistics(self)
    }

    fn cleanup_old_records(&self, days: i64) -> GatewayResult<usize> {
        FaucetDatabase::cleanup_old_records(self, days)
    }
}
