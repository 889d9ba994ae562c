//! Error type for remote provider calls

use thiserror::Error;

/// HTTP status the provider uses to signal rate limiting
pub const THROTTLE_STATUS: u16 = 429;

/// Error code for a response that could not be interpreted
pub const MALFORMED_RESPONSE: &str = "MalformedResponse";

/// Failure reported by a provider list/delete call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    /// HTTP status of the failed response, if one was received
    pub status_code: Option<u16>,
    /// Service error code (e.g. `ResourceNotFoundException`)
    pub error_code: Option<String>,
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            error_code: None,
            message: message.into(),
        }
    }

    /// Create the error the provider returns when rate limiting a caller
    pub fn throttled() -> Self {
        Self::new("Rate exceeded")
            .with_status(THROTTLE_STATUS)
            .with_error_code("TooManyRequestsException")
    }

    /// Create the error for a successful response carrying unusable data
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(message).with_error_code(MALFORMED_RESPONSE)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    /// Whether the provider rejected the call because of its request-rate limits
    pub fn is_throttle(&self) -> bool {
        self.status_code == Some(THROTTLE_STATUS)
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code == Some(404)
    }

    pub fn is_malformed(&self) -> bool {
        self.status_code.is_none() && self.error_code.as_deref() == Some(MALFORMED_RESPONSE)
    }
}
