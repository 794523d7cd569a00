use gateway_faucet::FaucetService;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Periodically prune faucet history. The first pass runs immediately.
pub fn spawn_cleanup_task(faucet: Arc<FaucetService>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match faucet.cleanup_old_records() {
                Ok(count) => info!("Cleaned up {} old records", count),
                Err(e) => warn!("Cleanup failed: {:?}", e),
            }
        }
    })
}
