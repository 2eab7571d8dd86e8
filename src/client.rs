//! Reddit Auth Client
//!
//! High-level client combining the token manager with authorized request execution.

use std::sync::Arc;

use crate::core::{
    dispatch, HttpRequest, HttpRequestBuilder, HttpResponse, HttpTransport, Outcome,
    ReqwestHttpTransport,
};
use crate::error::{RedditAuthError, TransportError};
use crate::token::AuthManager;
use crate::types::{Credentials, RedditAuthConfig};

/// Client for authorized reddit API requests.
pub struct RedditAuthClient<T: HttpTransport = ReqwestHttpTransport> {
    config: RedditAuthConfig,
    transport: Arc<T>,
    auth: AuthManager<T>,
}

impl RedditAuthClient<ReqwestHttpTransport> {
    /// Create a client with the default reqwest transport.
    pub fn new(config: RedditAuthConfig, credentials: Credentials) -> Result<Self, RedditAuthError> {
        let transport = ReqwestHttpTransport::new(&config)?;
        Ok(Self::with_transport(config, credentials, transport))
    }
}

impl<T: HttpTransport + 'static> RedditAuthClient<T> {
    /// Create a client with a custom transport.
    pub fn with_transport(config: RedditAuthConfig, credentials: Credentials, transport: T) -> Self {
        let transport = Arc::new(transport);
        let auth = AuthManager::new(&config, credentials, transport.clone());

        Self {
            config,
            transport,
            auth,
        }
    }
}

impl<T: HttpTransport> RedditAuthClient<T> {
    pub fn config(&self) -> &RedditAuthConfig {
        &self.config
    }

    pub fn auth(&self) -> &AuthManager<T> {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut AuthManager<T> {
        &mut self.auth
    }

    /// Request builder targeting the OAuth API host.
    pub fn request(&self) -> HttpRequestBuilder {
        HttpRequest::builder().host(self.config.oauth_host.as_str())
    }

    /// Authorize and send a request. Non-2xx responses become errors.
    pub async fn execute(
        &mut self,
        builder: HttpRequestBuilder,
    ) -> Result<HttpResponse, RedditAuthError> {
        let request = self.auth.authorize(builder).await?.build()?;
        let response = self.transport.send(&request).await?;

        if !response.is_success() {
            return Err(TransportError::Status {
                status: response.status,
                body: response.body,
            }
            .into());
        }

        Ok(response)
    }

    /// Authorize a request and route its result to the registered handlers.
    pub async fn dispatch(&mut self, builder: HttpRequestBuilder) -> Result<Outcome, RedditAuthError> {
        let request = self.auth.authorize(builder).await?.build()?;
        Ok(dispatch(self.transport.as_ref(), request).await)
    }
}

/// Create a client with the default transport.
pub fn reddit_auth_client(
    config: RedditAuthConfig,
    credentials: Credentials,
) -> Result<RedditAuthClient, RedditAuthError> {
    RedditAuthClient::new(config, credentials)
}
