use crate::config::GatewayConfig;
use crate::lookup::HashLookupController;
use crate::routes::build_router;
use crate::tasks::spawn_cleanup_task;
use anyhow::{Context, Result};
use axum::Router;
use gateway_faucet::{FaucetDatabase, FaucetService, LedgerTransfer};
use gateway_rpc::methods::build_registry;
use gateway_rpc::{RequestLogger, RpcDispatcher, UpstreamClient};
use gateway_storage::SledDB;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

/// Fully wired gateway, ready to serve
pub struct GatewayService {
    config: GatewayConfig,
    router: Router,
    faucet: Arc<FaucetService>,
    faucet_db: Arc<FaucetDatabase>,
}

impl GatewayService {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;

        info!("Configuration:");
        info!("  Server address: {}", config.server_addr);
        info!("  RPC URL: {}", config.upstream.rpc_url);
        info!("  Dispense amount: {} wei", config.faucet.dispense_amount);
        info!("  Address cooldown: {}s", config.faucet.cooldown_secs);

        let upstream = Arc::new(UpstreamClient::new(
            config.upstream.rpc_url.clone(),
            config.upstream.timeout(),
        )?);

        let registry = build_registry(&config.upstream, upstream.clone())?;
        info!("Registered {} RPC methods", registry.len());
        let rpc = Arc::new(RequestLogger::new(RpcDispatcher::new(Arc::new(registry))));

        let faucet_db = Arc::new(
            FaucetDatabase::new(&config.faucet.db_path)
                .with_context(|| format!("Failed to open faucet database at {}", config.faucet.db_path))?,
        );
        info!("Database initialized at: {}", config.faucet.db_path);

        let transfer = Arc::new(LedgerTransfer::new(
            upstream,
            config.faucet.faucet_address()?,
            config.faucet.dispense_amount_wei()?,
        ));
        let faucet = Arc::new(FaucetService::new(config.faucet.clone(), faucet_db.clone(), transfer));

        let store = SledDB::new(&config.storage.db_path, &config.storage.hash_tree)
            .with_context(|| format!("Failed to open hash store at {}", config.storage.db_path))?;
        let lookup = Arc::new(HashLookupController::new(Arc::new(store)));

        let router = build_router(rpc, faucet.clone(), lookup, &config);

        Ok(Self {
            config,
            router,
            faucet,
            faucet_db,
        })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until Ctrl+C or SIGTERM, then stop background work and flush
    pub async fn run(self) -> Result<()> {
        let stats = self.faucet.statistics();
        info!("Previous statistics:");
        info!("  Total distributions: {}", stats.total_distributions);
        info!("  Unique addresses: {}", stats.unique_addresses);

        let cleanup = spawn_cleanup_task(self.faucet.clone(), self.config.cleanup_interval());

        let addr = self.config.socket_addr()?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!("Server started at http://{}", addr);

        axum::serve(
            listener,
            self.router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        cleanup.abort();
        self.faucet_db.flush().await?;

        info!("Shutting down gracefully");
        Ok(())
    }
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
