//! Model backend errors
//!
//! Every failure talking to the model ends up as a [`BackendError`]. None of
//! them are recovered: the run aborts.

use std::fmt;

/// Errors that can occur while talking to a model backend
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// API request failed with the given message
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// Authentication failed or credentials are invalid
    AuthenticationError { message: String },

    /// Request timed out after the specified duration (in seconds)
    TimeoutError { seconds: u64 },

    /// Network-related error
    NetworkError { message: String },

    /// Generic error for other cases
    Other { message: String },
}

const AUTH_MARKERS: &[&str] = &[
    "401",
    "403",
    "unauthorized",
    "forbidden",
    "api key",
    "api_key",
    "auth",
];

const NETWORK_MARKERS: &[&str] = &[
    "error sending request",
    "connection refused",
    "connection reset",
    "connect error",
    "dns error",
    "failed to lookup address",
    "tcp connect",
];

impl BackendError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, BackendError::TimeoutError { .. })
    }

    /// Classifies a provider client failure by its message.
    ///
    /// Credential problems become [`BackendError::AuthenticationError`],
    /// transport failures [`BackendError::NetworkError`], and everything else
    /// an [`BackendError::ApiError`] prefixed with the provider name.
    pub fn from_provider_failure(provider: &str, detail: &str) -> Self {
        let lower = detail.to_lowercase();

        if NETWORK_MARKERS.iter().any(|m| lower.contains(m)) {
            BackendError::NetworkError {
                message: format!("{}: {}", provider, detail),
            }
        } else if AUTH_MARKERS.iter().any(|m| lower.contains(m)) {
            BackendError::AuthenticationError {
                message: format!("{}: {}", provider, detail),
            }
        } else {
            BackendError::ApiError {
                message: format!("{} request failed: {}", provider, detail),
                status_code: None,
            }
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::ApiError {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "API error ({}): {}", code, message)
                } else {
                    write!(f, "API error: {}", message)
                }
            }
            BackendError::AuthenticationError { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            BackendError::TimeoutError { seconds } => {
                write!(f, "Request timed out after {} seconds", seconds)
            }
            BackendError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
            BackendError::Other { message } => {
                write!(f, "Error: {}", message)
            }
        }
    }
}

impl std::error::Error for BackendError {}
