//! Testnet token faucet
//!
//! Hands out a fixed amount to any well-formed address, at most once per
//! cooldown window per address. The HTTP surface deliberately reports every
//! refusal other than a malformed address with the same message.

pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod service;
pub mod transfer;

pub use config::FaucetConfig;
pub use database::{DispenseStore, DistributionRecord, FaucetDatabase, FaucetStatistics};
pub use error::FaucetRejection;
pub use service::FaucetService;
pub use transfer::{FundedTransfer, LedgerTransfer};
