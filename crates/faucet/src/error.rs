//! HTTP mapping of faucet failures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gateway_common::GatewayError;
use serde_json::json;

pub const INVALID_ADDRESS_MESSAGE: &str = "invalid address";

/// Shared by cooldown, transfer and storage failures so callers cannot tell them apart
pub const RETRY_LATER_MESSAGE: &str = "please try again after 10 minutes";

/// A failed faucet request as seen by the HTTP caller
#[derive(Debug)]
pub struct FaucetRejection(pub GatewayError);

impl FaucetRejection {
    pub fn message(&self) -> &'static str {
        match self.0 {
            GatewayError::InvalidInput(_) => INVALID_ADDRESS_MESSAGE,
            _ => RETRY_LATER_MESSAGE,
        }
    }
}

impl From<GatewayError> for FaucetRejection {
    fn from(err: GatewayError) -> Self {
        FaucetRejection(err)
    }
}

impl IntoResponse for FaucetRejection {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message() }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            FaucetRejection(GatewayError::InvalidInput("invalid address".into())).message(),
            "invalid address"
        );
        assert_eq!(
            FaucetRejection(GatewayError::CooldownActive { remaining_secs: 30 }).message(),
            RETRY_LATER_MESSAGE
        );
        assert_eq!(
            FaucetRejection(GatewayError::TransferFailed("insufficient funds".into())).message(),
            RETRY_LATER_MESSAGE
        );
        assert_eq!(
            FaucetRejection(GatewayError::DependencyFailure("db".into())).message(),
            RETRY_LATER_MESSAGE
        );
    }

    #[test]
    fn test_status_is_bad_request() {
        let response = FaucetRejection(GatewayError::TransferFailed("x".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
