//! Resolves JSON-RPC calls against the method registry

use crate::normalizer::ErrorNormalizer;
use crate::registry::{CallContext, MethodRegistry};
use crate::types::{RpcReply, RpcRequest, RpcResponse};
use futures::future::join_all;
use gateway_common::GatewayError;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

/// Stateless per call; clone freely
#[derive(Clone, Debug)]
pub struct RpcDispatcher {
    registry: Arc<MethodRegistry>,
}

impl RpcDispatcher {
    pub fn new(registry: Arc<MethodRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Dispatch a bare request or a batch.
    ///
    /// Returns `None` when nothing needs answering (only notifications).
    /// Batch items run as separate tasks; the reply keeps request order.
    pub async fn dispatch(&self, payload: Value, ctx: CallContext) -> Option<RpcReply> {
        match payload {
            Value::Array(items) => {
                if items.is_empty() {
                    return Some(RpcReply::Single(ErrorNormalizer::normalize(
                        Value::Null,
                        &GatewayError::invalid_request(),
                    )));
                }

                debug!("Dispatching batch of {} calls", items.len());
                let calls = items
                    .into_iter()
                    .map(|item| Self::dispatch_one(self.registry.clone(), item, ctx.clone()));
                let responses: Vec<RpcResponse> = join_all(calls).await.into_iter().flatten().collect();

                if responses.is_empty() {
                    None
                } else {
                    Some(RpcReply::Batch(responses))
                }
            }
            single => Self::dispatch_one(self.registry.clone(), single, ctx)
                .await
                .map(RpcReply::Single),
        }
    }

    async fn dispatch_one(
        registry: Arc<MethodRegistry>,
        item: Value,
        ctx: CallContext,
    ) -> Option<RpcResponse> {
        let request = match RpcRequest::from_value(item) {
            Ok(request) => request,
            Err(id) => {
                return Some(ErrorNormalizer::normalize(id, &GatewayError::invalid_request()))
            }
        };

        let RpcRequest { id, method, params, .. } = request;

        let outcome = match registry.get(&method) {
            None => Err(GatewayError::MethodNotFound(method)),
            Some(handler) => {
                let task = tokio::spawn(async move { handler.call(params, ctx).await });
                match task.await {
                    Ok(result) => result,
                    Err(join_err) => {
                        error!("Handler for {} aborted: {}", method, join_err);
                        Err(GatewayError::Unclassified {
                            code: None,
                            message: None,
                        })
                    }
                }
            }
        };

        // Notifications run but are never answered
        let id = id?;

        Some(match outcome {
            Ok(result) => RpcResponse::success(id, result),
            Err(err) => ErrorNormalizer::normalize(id, &err),
        })
    }
}
