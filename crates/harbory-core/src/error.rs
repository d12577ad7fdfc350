//! Error types for Harbory client operations.
//!
//! Every failure the request pipeline can observe maps onto one variant of
//! [`Error`], and from there onto the closed [`ErrorKind`] set that callers
//! branch on when they inspect a canonical error result.

use serde::Serialize;
use thiserror::Error;

/// Main error type for Harbory operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Transport failure (DNS, connection refused, TLS, transport timeout)
    #[error("{0}")]
    Network(String),

    /// Backend answered with a non-2xx status other than 401
    #[error("HTTP error! status: {status}")]
    HttpStatus {
        /// Numeric HTTP status code
        status: u16,
    },

    /// Response body could not be decoded
    #[error("{0}")]
    Decode(String),

    /// Backend rejected the session credential
    #[error("Unauthorized")]
    Unauthorized,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Session credential could not be read or written
    #[error("Credential store error: {0}")]
    CredentialStore(String),
}

/// Specialized result type for Harbory operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Closed classification of request pipeline failures.
///
/// Attached to every canonical error result so callers can branch on the
/// failure class instead of parsing message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Request never produced an HTTP response.
    Network,
    /// Non-2xx response other than 401, carrying the status code.
    HttpStatus(u16),
    /// Response body was not valid JSON or did not match the declared type.
    Decode,
    /// 401 response; the session credential has been evicted.
    Unauthorized,
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "NETWORK_ERROR",
            Self::HttpStatus { .. } => "HTTP_STATUS",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::CredentialStore(_) => "CREDENTIAL_STORE_ERROR",
        }
    }

    /// Returns the pipeline classification of this error.
    ///
    /// Errors that can only occur while configuring a client or persisting a
    /// credential have no pipeline kind and return `None`.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Network(_) => Some(ErrorKind::Network),
            Self::HttpStatus { status } => Some(ErrorKind::HttpStatus(*status)),
            Self::Decode(_) => Some(ErrorKind::Decode),
            Self::Unauthorized => Some(ErrorKind::Unauthorized),
            Self::ConfigError(_)
            | Self::ValidationError(_)
            | Self::InvalidEndpoint(_)
            | Self::CredentialStore(_) => None,
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        !matches!(self, Self::Unauthorized)
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::CredentialStore(err.to_string())
    }
}
