//! Request/response audit log around the dispatcher

use crate::dispatcher::RpcDispatcher;
use crate::registry::CallContext;
use crate::types::RpcReply;
use serde_json::Value;
use tracing::{error, info};

/// Wraps `RpcDispatcher` and records every call and its outcome.
///
/// Only the `tracing` macros are used here, so nothing on this path can fail
/// or change the reply handed back to the caller.
#[derive(Clone, Debug)]
pub struct RequestLogger {
    dispatcher: RpcDispatcher,
}

impl RequestLogger {
    pub fn new(dispatcher: RpcDispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &RpcDispatcher {
        &self.dispatcher
    }

    pub async fn handle(&self, payload: Value, ctx: CallContext) -> Option<RpcReply> {
        let ip = ctx.ip.map(|ip| ip.to_string()).unwrap_or_else(|| "unknown".to_string());
        info!(">>> {} {}", ip, method_summary(&payload));

        let request_string = format!("<<< {}", payload);
        let reply = self.dispatcher.dispatch(payload, ctx).await;

        match &reply {
            Some(reply) => {
                let response_string = serde_json::to_string(reply).unwrap_or_default();
                if reply.has_error() {
                    error!("{} {}", request_string, response_string);
                } else {
                    info!("{} {}", request_string, response_string);
                }
            }
            None => info!("{} (no response)", request_string),
        }

        reply
    }
}

/// Method name of a bare request, or the method list of a batch
pub fn method_summary(payload: &Value) -> String {
    fn name(item: &Value) -> &str {
        item.get("method").and_then(Value::as_str).unwrap_or("-")
    }

    match payload {
        Value::Array(items) => {
            let names: Vec<&str> = items.iter().map(name).collect();
            format!("batch[{}] {}", items.len(), names.join(","))
        }
        other => name(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{handler_fn, MethodRegistry};
    use gateway_common::GatewayError;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context as LayerContext, Layer, SubscriberExt};

    #[test]
    fn test_method_summary() {
        assert_eq!(method_summary(&json!({"method": "eth_call"})), "eth_call");
        assert_eq!(method_summary(&json!({"id": 1})), "-");
        assert_eq!(
            method_summary(&json!([{"method": "a"}, {"method": "b"}, 3])),
            "batch[3] a,b,-"
        );
    }

    #[tokio::test]
    async fn test_reply_passes_through_unchanged() {
        let registry = MethodRegistry::builder()
            .register("ok", handler_fn(|_, _| async { Ok(json!(1)) }))
            .unwrap()
            .register("bad", handler_fn(|_, _| async { Err(GatewayError::from("nope")) }))
            .unwrap()
            .build();
        let dispatcher = RpcDispatcher::new(Arc::new(registry));
        let logger = RequestLogger::new(dispatcher.clone());

        for payload in [
            json!({"id": 1, "method": "ok"}),
            json!({"id": 2, "method": "bad"}),
            json!([{"id": 3, "method": "ok"}, {"id": 4, "method": "missing"}]),
        ] {
            let logged = logger.handle(payload.clone(), CallContext::default()).await;
            let direct = dispatcher.dispatch(payload, CallContext::default()).await;
            assert_eq!(logged, direct);
        }
    }

    #[derive(Clone, Default)]
    struct CapturedEvents(Arc<Mutex<Vec<(Level, String)>>>);

    struct MessageVisitor(String);

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{:?}", value);
            }
        }
    }

    impl<S: Subscriber> Layer<S> for CapturedEvents {
        fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.0.lock().unwrap().push((*event.metadata().level(), visitor.0));
        }
    }

    impl CapturedEvents {
        fn response_levels(&self) -> Vec<Level> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .filter(|(_, message)| message.starts_with("<<<"))
                .map(|(level, _)| *level)
                .collect()
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_error_replies_logged_at_error_level() {
        let registry = MethodRegistry::builder()
            .register("ok", handler_fn(|_, _| async { Ok(json!(1)) }))
            .unwrap()
            .register("bad", handler_fn(|_, _| async { Err(GatewayError::from("nope")) }))
            .unwrap()
            .build();
        let logger = RequestLogger::new(RpcDispatcher::new(Arc::new(registry)));

        let events = CapturedEvents::default();
        let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(events.clone()));

        logger.handle(json!({"id": 1, "method": "ok"}), CallContext::default()).await;
        assert_eq!(events.response_levels(), vec![Level::INFO]);

        logger.handle(json!({"id": 2, "method": "bad"}), CallContext::default()).await;
        assert_eq!(events.response_levels(), vec![Level::INFO, Level::ERROR]);

        logger
            .handle(json!([{"id": 3, "method": "ok"}, {"id": 4, "method": "missing"}]), CallContext::default())
            .await;
        assert_eq!(events.response_levels(), vec![Level::INFO, Level::ERROR, Level::ERROR]);
    }
}
