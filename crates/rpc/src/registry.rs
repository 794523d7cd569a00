//! Method name -> handler mapping, built once at startup

use async_trait::async_trait;
use gateway_common::GatewayResult;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::net::IpAddr;
use std::sync::Arc;
use thiserror::Error;

/// Per-call information handed to every handler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContext {
    pub ip: Option<IpAddr>,
}

impl CallContext {
    pub fn new(ip: Option<IpAddr>) -> Self {
        Self { ip }
    }
}

#[async_trait]
pub trait RpcHandler: Send + Sync {
    async fn call(&self, params: Value, ctx: CallContext) -> GatewayResult<Value>;
}

/// Adapter turning an async closure into a handler
pub struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> RpcHandler for FnHandler<F>
where
    F: Fn(Value, CallContext) -> Fut + Send + Sync,
    Fut: Future<Output = GatewayResult<Value>> + Send,
{
    async fn call(&self, params: Value, ctx: CallContext) -> GatewayResult<Value> {
        (self.0)(params, ctx).await
    }
}

pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn RpcHandler>
where
    F: Fn(Value, CallContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = GatewayResult<Value>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("method name must not be empty")]
    EmptyName,

    #[error("method {0} registered twice")]
    Duplicate(String),
}

/// Immutable after `build()`; shared without locking
#[derive(Clone, Default)]
pub struct MethodRegistry {
    methods: HashMap<String, Arc<dyn RpcHandler>>,
}

impl MethodRegistry {
    pub fn builder() -> MethodRegistryBuilder {
        MethodRegistryBuilder::default()
    }

    pub fn get(&self, method: &str) -> Option<Arc<dyn RpcHandler>> {
        self.methods.get(method).cloned()
    }

    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Registered names, sorted
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.method_names())
            .finish()
    }
}

#[derive(Default)]
pub struct MethodRegistryBuilder {
    methods: HashMap<String, Arc<dyn RpcHandler>>,
}

impl MethodRegistryBuilder {
    pub fn register(
        mut self,
        name: impl Into<String>,
        handler: Arc<dyn RpcHandler>,
    ) -> Result<Self, RegistryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.methods.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        self.methods.insert(name, handler);
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn build(self) -> MethodRegistry {
        MethodRegistry {
            methods: self.methods,
        }
    }
}
