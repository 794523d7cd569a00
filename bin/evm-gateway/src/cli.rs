use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "evm-gateway")]
#[command(about = "EVM JSON-RPC gateway with faucet and hash lookup", long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    pub config: PathBuf,

    /// Listen address, e.g. 0.0.0.0:3000
    #[arg(long)]
    pub server_addr: Option<String>,

    /// Upstream ledger node URL
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
