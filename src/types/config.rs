//! Configuration Types
//!
//! Endpoint and transport configuration.

use std::time::Duration;

/// reddit's token endpoint, used by every grant.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://www.reddit.com/api/v1/access_token";

/// Host serving authenticated API calls.
pub const DEFAULT_OAUTH_HOST: &str = "oauth.reddit.com";

/// Sent when no user agent is configured. Bots should set their own
/// `<platform>:<app id>:<version> (by /u/<username>)` agent.
pub const DEFAULT_USER_AGENT: &str = concat!("rust:reddit-oauth:v", env!("CARGO_PKG_VERSION"));

/// Default configuration values.
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 1048576;

/// Client configuration.
#[derive(Clone, Debug)]
pub struct RedditAuthConfig {
    /// Token endpoint URL.
    pub token_endpoint: String,
    /// Host for authenticated API requests.
    pub oauth_host: String,
    /// User agent sent with every request. reddit rejects generic agents.
    pub user_agent: String,
    /// HTTP timeout.
    pub timeout: Duration,
    /// Largest response body accepted by the transport.
    pub max_response_size: usize,
}

impl Default for RedditAuthConfig {
    fn default() -> Self {
        Self {
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
            oauth_host: DEFAULT_OAUTH_HOST.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
        }
    }
}

/// Grant type sent to the token endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrantType {
    Password,
    ClientCredentials,
    InstalledClient,
    RefreshToken,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::ClientCredentials => "client_credentials",
            Self::InstalledClient => "https://oauth.reddit.com/grants/installed_client",
            Self::RefreshToken => "refresh_token",
        }
    }
}
