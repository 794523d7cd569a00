mod cli;
mod config_loader;

use clap::Parser;
use gateway_common::utils::logging::init_logging;
use gateway_server::GatewayService;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse CLI
    let args = cli::Cli::parse();

    // 2. Load Config
    let config = config_loader::load_gateway_config(&args)?;

    // 3. Setup Logging
    init_logging(&config.logging)?;
    info!("Starting EVM gateway v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config from {:?}", args.config);

    // 4. Initialize Gateway
    let gateway = GatewayService::new(config)?;

    // 5. Serve until shutdown
    gateway.run().await
}
