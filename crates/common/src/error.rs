use thiserror::Error;

/// Code used for failures that carry no code of their own
pub const DEFAULT_ERROR_CODE: i64 = -32000;

/// Message used for failures that carry no message of their own
pub const DEFAULT_ERROR_MESSAGE: &str = "Internal error";

pub const INVALID_REQUEST_CODE: i64 = -32600;
pub const METHOD_NOT_FOUND_CODE: i64 = -32601;
pub const INVALID_PARAMS_CODE: i64 = -32602;
pub const RESOURCE_UNAVAILABLE_CODE: i64 = -32002;
pub const TRANSACTION_REJECTED_CODE: i64 = -32003;
pub const LIMIT_EXCEEDED_CODE: i64 = -32005;

/// Every failure the gateway can produce.
///
/// Components construct the variant that describes what went wrong; the
/// JSON-RPC layer reads `code()` and `message()` and the REST endpoints map
/// variants to HTTP statuses. Nothing downstream inspects the shape of an
/// error to guess its kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Malformed address, hash or params
    #[error("{0}")]
    InvalidInput(String),

    /// Method name is not registered
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Address was funded too recently, or a dispense for it is in flight
    #[error("Cooldown active: try again in {remaining_secs} seconds")]
    CooldownActive { remaining_secs: u64 },

    /// Funded-transfer primitive reported a failure
    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    /// Lookup store or ledger unreachable
    #[error("Dependency failure: {0}")]
    DependencyFailure(String),

    /// Anything else; code and message are kept when the source had them
    #[error("{}", .message.as_deref().unwrap_or(DEFAULT_ERROR_MESSAGE))]
    Unclassified {
        code: Option<i64>,
        message: Option<String>,
    },
}

impl GatewayError {
    /// Numeric JSON-RPC code for this failure
    pub fn code(&self) -> i64 {
        match self {
            GatewayError::InvalidInput(_) => INVALID_PARAMS_CODE,
            GatewayError::MethodNotFound(_) => METHOD_NOT_FOUND_CODE,
            GatewayError::CooldownActive { .. } => LIMIT_EXCEEDED_CODE,
            GatewayError::TransferFailed(_) => TRANSACTION_REJECTED_CODE,
            GatewayError::DependencyFailure(_) => RESOURCE_UNAVAILABLE_CODE,
            GatewayError::Unclassified { code, .. } => code.unwrap_or(DEFAULT_ERROR_CODE),
        }
    }

    /// Human readable message placed in the JSON-RPC error object
    pub fn message(&self) -> String {
        match self {
            GatewayError::MethodNotFound(_) => "Method not found".to_string(),
            other => other.to_string(),
        }
    }

    /// Request object that could not be read as a JSON-RPC call
    pub fn invalid_request() -> Self {
        GatewayError::Unclassified {
            code: Some(INVALID_REQUEST_CODE),
            message: Some("Invalid Request".to_string()),
        }
    }

    /// Failure with an explicit code, e.g. an error object relayed from upstream
    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        GatewayError::Unclassified {
            code: Some(code),
            message: Some(message.into()),
        }
    }

    /// Failures caused by the request itself rather than a gateway dependency
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GatewayError::InvalidInput(_)
                | GatewayError::CooldownActive { .. }
                | GatewayError::TransferFailed(_)
        )
    }
}

impl From<&str> for GatewayError {
    fn from(message: &str) -> Self {
        GatewayError::Unclassified {
            code: None,
            message: Some(message.to_string()),
        }
    }
}

impl From<String> for GatewayError {
    fn from(message: String) -> Self {
        GatewayError::Unclassified {
            code: None,
            message: Some(message),
        }
    }
}

impl From<anyhow::Error> for GatewayError {
    fn from(err: anyhow::Error) -> Self {
        GatewayError::Unclassified {
            code: None,
            message: Some(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::InvalidInput(err.to_string())
    }
}

/// Result type alias for convenience
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;
