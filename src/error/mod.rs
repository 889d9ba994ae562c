use std::fmt::Display;
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, provider_code, provider_code_for_status, ErrorCode};

use crate::provider::ProviderError;

/// The unified error type for lambda-prune
#[derive(Error, Debug)]
pub enum PruneError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Provider error: {message}")]
    Provider {
        code: u16,
        message: String,
        lambda_name: Option<String>,
        #[source]
        source: Option<ProviderError>,
    },

    #[error("[E{code:04}] {message}")]
    Other {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PruneError {
    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a provider failure for a specific lambda
    pub fn provider(lambda_name: impl Into<String>, error: ProviderError) -> Self {
        Self::Provider {
            code: provider_code(&error),
            message: error.to_string(),
            lambda_name: Some(lambda_name.into()),
            source: Some(error),
        }
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            code: ErrorCode::OTHER_GENERIC,
            message: message.into(),
            source: None,
        }
    }

    /// Attach an underlying cause
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Config { source: src, .. } | Self::Other { source: src, .. } => {
                *src = Some(source.into());
            }
            // Provider errors keep their typed source
            Self::Provider { .. } => {}
        }
        self
    }

    /// Add context to the error message
    pub fn with_context(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::Config { message, .. }
            | Self::Provider { message, .. }
            | Self::Other { message, .. } => {
                *message = format!("{}: {}", context, message);
            }
        }
        self
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::Provider { .. } => 3,
            Self::Other { .. } => 1,
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. } | Self::Provider { code, .. } | Self::Other { code, .. } => {
                *code
            }
        }
    }

    /// Message without the code prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Config { message, .. }
            | Self::Provider { message, .. }
            | Self::Other { message, .. } => message,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, .. } => message.clone(),
            Self::Provider {
                message,
                lambda_name,
                ..
            } => match lambda_name {
                Some(name) => format!("Request for {} failed: {}", name, message),
                None => format!("Provider request failed: {}", message),
            },
            Self::Other { message, .. } => message.clone(),
        }
    }

    /// Get a detailed message including the code description
    pub fn developer_message(&self) -> String {
        format!("{} ({})", self, describe_error_code(self.code()))
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

impl From<ProviderError> for PruneError {
    fn from(error: ProviderError) -> Self {
        Self::Provider {
            code: provider_code(&error),
            message: error.to_string(),
            lambda_name: None,
            source: Some(error),
        }
    }
}

#[cfg(test)]
mod tests;
