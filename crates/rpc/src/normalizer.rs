use crate::types::{RpcErrorObject, RpcResponse};
use gateway_common::GatewayError;
use serde_json::{json, Value};

/// Turns any dispatch failure into a JSON-RPC error response
pub struct ErrorNormalizer;

impl ErrorNormalizer {
    /// Pure and infallible: the same id and error always give the same object.
    /// The message is repeated under `data.message` so it survives clients that
    /// only surface `data`.
    pub fn normalize(id: Value, error: &GatewayError) -> RpcResponse {
        RpcResponse::failure(id, Self::error_object(error))
    }

    pub fn error_object(error: &GatewayError) -> RpcErrorObject {
        let message = error.message();
        RpcErrorObject {
            code: error.code(),
            data: Some(json!({ "message": message })),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_not_found() {
        let response = ErrorNormalizer::normalize(
            json!(1),
            &GatewayError::MethodNotFound("no_such_method".into()),
        );
        let error = response.error.unwrap();
        assert_eq!(response.id, json!(1));
        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "Method not found");
        assert_eq!(error.data, Some(json!({"message": "Method not found"})));
        assert!(response.result.is_none());
    }

    #[test]
    fn test_plain_string_failure() {
        let error = ErrorNormalizer::error_object(&GatewayError::from("insufficient funds"));
        assert_eq!(error.code, -32000);
        assert_eq!(error.message, "insufficient funds");
        assert_eq!(error.data, Some(json!({"message": "insufficient funds"})));
    }

    #[test]
    fn test_missing_message_defaults() {
        let error = ErrorNormalizer::error_object(&GatewayError::Unclassified {
            code: None,
            message: None,
        });
        assert_eq!(error.code, -32000);
        assert_eq!(error.message, "Internal error");
    }

    #[test]
    fn test_code_propagated() {
        let error = ErrorNormalizer::error_object(&GatewayError::with_code(3, "execution reverted"));
        assert_eq!(error.code, 3);
        assert_eq!(error.message, "execution reverted");
    }

    #[test]
    fn test_deterministic() {
        let err = GatewayError::DependencyFailure("ledger unreachable".into());
        assert_eq!(
            ErrorNormalizer::normalize(json!("a"), &err),
            ErrorNormalizer::normalize(json!("a"), &err)
        );
    }
}
