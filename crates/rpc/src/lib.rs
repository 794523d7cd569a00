//! JSON-RPC 2.0 dispatch for the gateway
//!
//! Requests (bare or batched) are resolved against a `MethodRegistry` built at
//! startup, failures are folded into JSON-RPC error objects by
//! `ErrorNormalizer`, and `RequestLogger` keeps an audit trail of every call.

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod logger;
pub mod methods;
pub mod normalizer;
pub mod registry;
pub mod types;

pub use client::UpstreamClient;
pub use config::UpstreamConfig;
pub use dispatcher::RpcDispatcher;
pub use logger::RequestLogger;
pub use normalizer::ErrorNormalizer;
pub use registry::{handler_fn, CallContext, MethodRegistry, RegistryError, RpcHandler};
pub use types::{RpcErrorObject, RpcReply, RpcRequest, RpcResponse};
