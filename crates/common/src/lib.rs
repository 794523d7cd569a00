pub mod error;
pub mod traits;
pub mod types;
pub mod utils;

pub use error::{GatewayError, GatewayResult};
pub use types::{Address, AddressError};
