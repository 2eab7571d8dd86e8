//! Script Grant
//!
//! Password grant for script apps, authenticating as the app's owner.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::core::{HttpRequest, HttpTransport};
use crate::error::{AuthStateError, ConfigurationError, RedditAuthError};
use crate::flows::exchange_token;
use crate::types::{AuthMethod, Credentials, GrantType, TokenData};

/// Script grant interface.
#[async_trait]
pub trait ScriptGrant: Send + Sync {
    /// Request a new token with the script's username and password.
    async fn request_token(&self, credentials: &Credentials) -> Result<TokenData, RedditAuthError>;
}

/// Script grant implementation.
pub struct ScriptGrantImpl<T: HttpTransport> {
    token_endpoint: String,
    transport: Arc<T>,
}

impl<T: HttpTransport> ScriptGrantImpl<T> {
    /// Create new script grant.
    pub fn new(token_endpoint: impl Into<String>, transport: Arc<T>) -> Self {
        Self {
            token_endpoint: token_endpoint.into(),
            transport,
        }
    }

    fn build_request(&self, credentials: &Credentials) -> Result<HttpRequest, RedditAuthError> {
        if credentials.auth_method() != AuthMethod::Script {
            return Err(AuthStateError::UnsupportedMethod {
                method: credentials.auth_method().as_str(),
                grant: "script",
            }
            .into());
        }

        let username = credentials.username().ok_or_else(|| missing("username"))?;
        let password = credentials.password().ok_or_else(|| missing("password"))?;

        HttpRequest::builder()
            .url(self.token_endpoint.as_str())
            .post_form([
                ("grant_type", GrantType::Password.as_str()),
                ("username", username),
                ("password", password),
            ])
            .basic_auth(credentials.client_id(), credentials.client_secret())
            .build()
    }
}

fn missing(field: &str) -> RedditAuthError {
    ConfigurationError::MissingField {
        field: field.to_string(),
    }
    .into()
}

#[async_trait]
impl<T: HttpTransport> ScriptGrant for ScriptGrantImpl<T> {
    async fn request_token(&self, credentials: &Credentials) -> Result<TokenData, RedditAuthError> {
        let request = self.build_request(credentials)?;
        exchange_token(self.transport.as_ref(), &request).await
    }
}

/// Mock script grant for testing.
#[derive(Default)]
pub struct MockScriptGrant {
    outcomes: Mutex<VecDeque<Result<TokenData, RedditAuthError>>>,
    request_history: Mutex<Vec<String>>,
}

impl MockScriptGrant {
    /// Create new mock grant.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a token to return.
    pub fn queue_token(&self, data: TokenData) -> &Self {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(data));
        self
    }

    /// Queue an error to return.
    pub fn queue_error(&self, error: RedditAuthError) -> &Self {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(error));
        self
    }

    /// Client ids of past requests.
    pub fn get_request_history(&self) -> Vec<String> {
        self.request_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ScriptGrant for MockScriptGrant {
    async fn request_token(&self, credentials: &Credentials) -> Result<TokenData, RedditAuthError> {
        self.request_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(credentials.client_id().to_string());

        let queued = self
            .outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        // Script apps never receive a refresh token
        queued.unwrap_or_else(|| {
            Ok(TokenData::new(
                "mock-script-token",
                "bearer",
                3600,
                vec!["*".to_string()],
                None,
            ))
        })
    }
}

/// Create mock script grant for testing.
pub fn create_mock_script_grant() -> MockScriptGrant {
    MockScriptGrant::new()
}
