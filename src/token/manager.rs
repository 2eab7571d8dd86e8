//! Auth Manager
//!
//! Maintains and renews access tokens for the reddit API.
//!
//! Only installed and web apps receive refresh tokens, and only when the user
//! granted permanent access. Script apps and application-only (userless)
//! access renew by simply requesting a new token, so they never need one.
//!
//! Renewal is always explicit: call [`AuthManager::renew`] when
//! [`AuthManager::needs_renewing`] says so, or use
//! [`AuthManager::valid_access_token`] to do both.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::{Clock, HttpRequest, HttpRequestBuilder, HttpTransport, SystemClock};
use crate::error::{AuthStateError, RedditAuthError};
use crate::flows::{
    exchange_token, ApplicationOnlyGrant, ApplicationOnlyGrantImpl, ScriptGrant, ScriptGrantImpl,
};
use crate::token::TokenState;
use crate::types::{AuthMethod, Credentials, GrantType, RedditAuthConfig, TokenData};

/// Token lifecycle manager.
///
/// Mutating operations take `&mut self`, so one instance renews at most once at
/// a time. Share it across tasks behind a `tokio::sync::Mutex`.
pub struct AuthManager<T: HttpTransport> {
    transport: Arc<T>,
    credentials: Arc<Credentials>,
    token_endpoint: String,
    script_grant: Arc<dyn ScriptGrant>,
    application_only_grant: Arc<dyn ApplicationOnlyGrant>,
    clock: Arc<dyn Clock>,
    state: TokenState,
}

impl<T: HttpTransport + 'static> AuthManager<T> {
    /// Create a manager using the default grant implementations over `transport`.
    pub fn new(config: &RedditAuthConfig, credentials: Credentials, transport: Arc<T>) -> Self {
        let script_grant = Arc::new(ScriptGrantImpl::new(
            config.token_endpoint.as_str(),
            transport.clone(),
        ));
        let application_only_grant = Arc::new(ApplicationOnlyGrantImpl::new(
            config.token_endpoint.as_str(),
            transport.clone(),
        ));

        Self {
            transport,
            credentials: Arc::new(credentials),
            token_endpoint: config.token_endpoint.clone(),
            script_grant,
            application_only_grant,
            clock: Arc::new(SystemClock),
            state: TokenState::new(),
        }
    }
}

impl<T: HttpTransport> AuthManager<T> {
    /// Replace the script grant strategy.
    pub fn with_script_grant(mut self, grant: Arc<dyn ScriptGrant>) -> Self {
        self.script_grant = grant;
        self
    }

    /// Replace the application-only grant strategy.
    pub fn with_application_only_grant(mut self, grant: Arc<dyn ApplicationOnlyGrant>) -> Self {
        self.application_only_grant = grant;
        self
    }

    /// Replace the clock used for expiry decisions.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn auth_method(&self) -> AuthMethod {
        self.credentials.auth_method()
    }

    /// Read-only view of the token state.
    pub fn state(&self) -> &TokenState {
        &self.state
    }

    /// The most up-to-date token data as understood by this manager.
    pub fn current(&self) -> Option<&TokenData> {
        self.state.current()
    }

    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.state.expiration()
    }

    /// Token used to request new access tokens. Only applies to installed and web apps.
    pub fn refresh_token(&self) -> Option<&str> {
        self.state.refresh_token()
    }

    /// Install a refresh token obtained elsewhere, e.g. from an interactive authorization.
    pub fn set_refresh_token(&mut self, refresh_token: Option<String>) {
        self.state.set_refresh_token(refresh_token);
    }

    /// The token used to access the API.
    pub fn access_token(&self) -> Result<&str, RedditAuthError> {
        self.state
            .current()
            .map(TokenData::access_token)
            .ok_or_else(|| AuthStateError::NoCurrentToken.into())
    }

    /// True if there is no current token or it has expired.
    pub fn needs_renewing(&self) -> bool {
        self.state.needs_renewing_at(self.clock.now())
    }

    /// True for script and userless apps; otherwise true only with a refresh token.
    pub fn can_renew(&self) -> bool {
        if self.auth_method().is_non_interactive() {
            true
        } else {
            self.state.refresh_token().is_some()
        }
    }

    /// Obtain fresh token data and make it current.
    ///
    /// On failure the token state is left untouched.
    pub async fn renew(&mut self) -> Result<TokenData, RedditAuthError> {
        let method = self.auth_method();

        let data = if method.is_script() {
            debug!(auth_method = %method, "Renewing with script grant");
            self.script_grant.request_token(&self.credentials).await?
        } else if method.is_userless() {
            debug!(auth_method = %method, "Renewing with application-only grant");
            self.application_only_grant
                .request_token(&self.credentials)
                .await?
        } else if let Some(refresh_token) = self.state.refresh_token() {
            debug!(auth_method = %method, "Renewing with refresh token");
            let request = self.refresh_request(refresh_token)?;
            exchange_token(self.transport.as_ref(), &request).await?
        } else {
            return Err(AuthStateError::CannotRenew.into());
        };

        self.replace_token(Some(data.clone()));
        Ok(data)
    }

    /// Make `data` current, recomputing the expiration and keeping the refresh
    /// token unless `data` carries a new one. `None` clears the current token.
    pub fn replace_token(&mut self, data: Option<TokenData>) {
        let now = self.clock.now();
        self.state.replace(data, now);

        if let (Some(data), Some(expiration)) = (self.state.current(), self.state.expiration()) {
            info!(
                auth_method = %self.auth_method(),
                expires_at = %expiration,
                scope = ?data.scope(),
                "Access token replaced"
            );
        }
    }

    /// Drop the current token. A held refresh token survives.
    pub fn invalidate(&mut self) {
        debug!("Invalidating current token");
        self.replace_token(None);
    }

    /// Access token, renewing first when it is missing or expired.
    pub async fn valid_access_token(&mut self) -> Result<String, RedditAuthError> {
        if self.needs_renewing() {
            if !self.can_renew() {
                return Err(AuthStateError::CannotRenew.into());
            }
            self.renew().await?;
        }

        Ok(self.access_token()?.to_string())
    }

    /// Add an `Authorization` header carrying a valid access token.
    pub async fn authorize(
        &mut self,
        builder: HttpRequestBuilder,
    ) -> Result<HttpRequestBuilder, RedditAuthError> {
        self.valid_access_token().await?;
        let header = self
            .state
            .current()
            .map(TokenData::authorization_header)
            .ok_or(AuthStateError::NoCurrentToken)?;

        Ok(builder.header("Authorization", header))
    }

    fn refresh_request(&self, refresh_token: &str) -> Result<HttpRequest, RedditAuthError> {
        HttpRequest::builder()
            .url(self.token_endpoint.as_str())
            .post_form([
                ("grant_type", GrantType::RefreshToken.as_str()),
                ("refresh_token", refresh_token),
            ])
            .basic_auth(self.credentials.client_id(), self.credentials.client_secret())
            .build()
    }
}

impl<T: HttpTransport> std::fmt::Debug for AuthManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("credentials", &self.credentials)
            .field("token_endpoint", &self.token_endpoint)
            .field("state", &self.state)
            .finish()
    }
}
