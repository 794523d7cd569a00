pub mod client_ip;
pub mod config;
pub mod logging;
