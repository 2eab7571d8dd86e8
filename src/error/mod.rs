//! Error Types
//!
//! Error hierarchy for token management and request building.

use std::time::Duration;
use thiserror::Error;

/// Root error type for the crate.
#[derive(Error, Debug)]
pub enum RedditAuthError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Auth state error: {0}")]
    AuthState(#[from] AuthStateError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl RedditAuthError {
    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "REDDIT_CONFIG",
            Self::AuthState(_) => "REDDIT_AUTH_STATE",
            Self::Auth(_) => "REDDIT_AUTH",
            Self::Transport(_) => "REDDIT_TRANSPORT",
            Self::Protocol(_) => "REDDIT_PROTOCOL",
        }
    }

    /// Check if the caller may reasonably retry. This crate never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Check if error requires the user to authorize the app again.
    pub fn needs_reauth(&self) -> bool {
        matches!(
            self,
            Self::Auth(AuthError::InvalidClientCredentials { .. })
                | Self::AuthState(AuthStateError::CannotRenew)
        )
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(TransportError::Status { status, .. }) => Some(*status),
            Self::Auth(AuthError::InvalidClientCredentials { source }) => source.status(),
            _ => None,
        }
    }
}

/// Malformed request or client configuration. Always a caller bug.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Expecting a non-empty host")]
    EmptyHost,

    #[error("URL parameter size mismatch. Expecting {expected}, got {actual}")]
    PathParameterMismatch { expected: usize, actual: usize },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid endpoint URL: {url}")]
    InvalidEndpoint { url: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Operation not allowed given the current token state.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthStateError {
    #[error("Cannot renew: no refresh token and not a non-interactive auth method")]
    CannotRenew,

    #[error("No current token data, renew first")]
    NoCurrentToken,

    #[error("Auth method {method} is not supported by the {grant} grant")]
    UnsupportedMethod {
        method: &'static str,
        grant: &'static str,
    },
}

/// Credential rejection by the token endpoint.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Incorrect client ID and/or client secret")]
    InvalidClientCredentials {
        #[source]
        source: TransportError,
    },
}

/// Non-success HTTP status or network-level failure.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed with status {status}")]
    Status { status: u16, body: String },

    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },
}

impl TransportError {
    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::ConnectionFailed { .. } | Self::Timeout { .. } => true,
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Response that could not be understood.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    #[error("Response too large: {size} bytes")]
    ResponseTooLarge { size: usize },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },
}

/// Result type for crate operations.
pub type RedditAuthResult<T> = Result<T, RedditAuthError>;

/// Map a non-success token endpoint response to an error.
///
/// 401 means the client id/secret pair was rejected; any other status is
/// surfaced as the plain transport error.
pub fn token_endpoint_error(status: u16, body: &str) -> RedditAuthError {
    let source = TransportError::Status {
        status,
        body: body.to_string(),
    };

    if status == 401 {
        return RedditAuthError::Auth(AuthError::InvalidClientCredentials { source });
    }

    RedditAuthError::Transport(source)
}
