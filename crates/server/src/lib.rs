//! HTTP gateway: JSON-RPC, faucet and hash lookup behind one listener

pub mod config;
pub mod lookup;
pub mod routes;
pub mod service;
pub mod tasks;

pub use config::{GatewayConfig, StorageConfig, TaskConfig};
pub use lookup::HashLookupController;
pub use routes::build_router;
pub use service::GatewayService;
