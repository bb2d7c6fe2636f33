//! Error Types

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Payment gateway errors
///
/// A sale or customer creation rejected by gateway validation is not an
/// error; it comes back as [`crate::GatewayResult::Invalid`].
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Request never reached the gateway, or the connection dropped
    #[error("Transport error: {0}")]
    Transport(String),

    /// Gateway rejected the API credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Record lookup found nothing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Gateway answered with a non-success HTTP status
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Gateway reported a non-validation error (server, authorization, ...)
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Operation not offered by this gateway
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Check if error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::UnexpectedStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Short machine-readable code for API error bodies
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "GATEWAY_UNREACHABLE",
            Self::Authentication(_) => "GATEWAY_AUTH",
            Self::NotFound(_) => "NOT_FOUND",
            Self::UnexpectedStatus { .. } | Self::Gateway(_) => "GATEWAY_ERROR",
            Self::Decode(_) => "GATEWAY_RESPONSE",
            Self::Unsupported(_) => "UNSUPPORTED",
            Self::Config(_) => "CONFIG",
        }
    }

    /// Convert to a user-friendly message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "The payment gateway is currently unreachable. Please try again.".into(),
            Self::Authentication(_) => "The payment gateway rejected the configured credentials.".into(),
            Self::NotFound(what) => format!("{what} could not be found."),
            Self::Unsupported(what) => format!("{what} is not supported by this gateway."),
            Self::Config(_) => "Payment gateway configuration error.".into(),
            _ => "The payment gateway returned an unexpected response.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(GatewayError::Transport("timeout".into()).is_retryable());
        assert!(GatewayError::UnexpectedStatus { status: 503, body: String::new() }.is_retryable());
        assert!(!GatewayError::UnexpectedStatus { status: 422, body: String::new() }.is_retryable());
        assert!(!GatewayError::Authentication("bad key".into()).is_retryable());
    }

    #[test]
    fn test_user_message_names_missing_record() {
        let err = GatewayError::NotFound("Transaction abc".into());
        assert_eq!(err.user_message(), "Transaction abc could not be found.");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn test_malformed_response_code() {
        let err = GatewayError::Decode("expected value at line 1 column 1".into());
        assert_eq!(err.code(), "GATEWAY_RESPONSE");
        assert!(!err.is_retryable());
        assert_eq!(err.user_message(), "The payment gateway returned an unexpected response.");
    }
}
