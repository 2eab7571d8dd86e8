//! Configuration Builder
//!
//! Fluent builder for client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{ConfigurationError, RedditAuthError};
use crate::types::RedditAuthConfig;

/// Configuration builder.
#[derive(Default)]
pub struct RedditAuthConfigBuilder {
    token_endpoint: Option<String>,
    oauth_host: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    max_response_size: Option<usize>,
}

impl RedditAuthConfigBuilder {
    /// Create new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the token endpoint.
    pub fn token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = Some(endpoint.into());
        self
    }

    /// Override the API host.
    pub fn oauth_host(mut self, host: impl Into<String>) -> Self {
        self.oauth_host = Some(host.into());
        self
    }

    /// Set the user agent, e.g. `"linux:my-bot:v1.0 (by /u/someone)"`.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the largest accepted response body.
    pub fn max_response_size(mut self, bytes: usize) -> Self {
        self.max_response_size = Some(bytes);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<RedditAuthConfig, RedditAuthError> {
        let defaults = RedditAuthConfig::default();

        let token_endpoint = self.token_endpoint.unwrap_or(defaults.token_endpoint);
        match Url::parse(&token_endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(ConfigurationError::InvalidEndpoint {
                    url: token_endpoint,
                }
                .into())
            }
        }

        let oauth_host = self.oauth_host.unwrap_or(defaults.oauth_host);
        if oauth_host.trim().is_empty() {
            return Err(ConfigurationError::EmptyHost.into());
        }

        let timeout = self.timeout.unwrap_or(defaults.timeout);
        if timeout.is_zero() {
            return Err(ConfigurationError::InvalidConfig {
                message: "timeout must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(RedditAuthConfig {
            token_endpoint,
            oauth_host,
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            timeout,
            max_response_size: self.max_response_size.unwrap_or(defaults.max_response_size),
        })
    }
}

/// Create a new configuration builder.
pub fn reddit_auth_config() -> RedditAuthConfigBuilder {
    RedditAuthConfigBuilder::new()
}
