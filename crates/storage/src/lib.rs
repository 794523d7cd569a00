pub mod sled;

pub use crate::sled::{SledDB, DEFAULT_TREE};
