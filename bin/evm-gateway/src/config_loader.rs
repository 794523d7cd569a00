use crate::cli::Cli;
use anyhow::Result;
use gateway_common::utils::config::load_config;
use gateway_server::GatewayConfig;

/// File, then `GATEWAY_*` environment, then command-line flags
pub fn load_gateway_config(args: &Cli) -> Result<GatewayConfig> {
    let mut config: GatewayConfig = load_config(&args.config)?;

    if let Some(addr) = &args.server_addr {
        config.server_addr = addr.clone();
    }
    if let Some(url) = &args.rpc_url {
        config.upstream.rpc_url = url.clone();
    }
    if args.debug {
        config.logging.level = "debug".to_string();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flags_override_defaults() {
        let args = Cli::parse_from([
            "evm-gateway",
            "--config",
            "/nonexistent/gateway.toml",
            "--server-addr",
            "127.0.0.1:9000",
            "--rpc-url",
            "http://node:8545",
            "--debug",
        ]);
        let config = load_gateway_config(&args).unwrap();

        assert_eq!(config.server_addr, "127.0.0.1:9000");
        assert_eq!(config.upstream.rpc_url, "http://node:8545");
        assert_eq!(config.logging.level, "debug");
    }
}
