//! Application-Only Grant
//!
//! Userless access. Confidential clients use the client credentials grant;
//! installed apps use reddit's installed-client grant keyed by a device id.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::core::{HttpRequest, HttpTransport};
use crate::error::{AuthStateError, ConfigurationError, RedditAuthError};
use crate::flows::exchange_token;
use crate::types::{AuthMethod, Credentials, GrantType, TokenData};

/// Application-only grant interface.
#[async_trait]
pub trait ApplicationOnlyGrant: Send + Sync {
    /// Request a token representing the app itself.
    async fn request_token(&self, credentials: &Credentials) -> Result<TokenData, RedditAuthError>;
}

/// Application-only grant implementation.
pub struct ApplicationOnlyGrantImpl<T: HttpTransport> {
    token_endpoint: String,
    transport: Arc<T>,
}

impl<T: HttpTransport> ApplicationOnlyGrantImpl<T> {
    /// Create new application-only grant.
    pub fn new(token_endpoint: impl Into<String>, transport: Arc<T>) -> Self {
        Self {
            token_endpoint: token_endpoint.into(),
            transport,
        }
    }

    fn build_request(&self, credentials: &Credentials) -> Result<HttpRequest, RedditAuthError> {
        let form: Vec<(&str, &str)> = match credentials.auth_method() {
            AuthMethod::Userless => vec![("grant_type", GrantType::ClientCredentials.as_str())],
            AuthMethod::UserlessInstalled => {
                let device_id = credentials.device_id().ok_or_else(|| {
                    RedditAuthError::from(ConfigurationError::MissingField {
                        field: "device_id".to_string(),
                    })
                })?;
                vec![
                    ("grant_type", GrantType::InstalledClient.as_str()),
                    ("device_id", device_id),
                ]
            }
            other => {
                return Err(AuthStateError::UnsupportedMethod {
                    method: other.as_str(),
                    grant: "application-only",
                }
                .into())
            }
        };

        HttpRequest::builder()
            .url(self.token_endpoint.as_str())
            .post_form(form)
            .basic_auth(credentials.client_id(), credentials.client_secret())
            .build()
    }
}

#[async_trait]
impl<T: HttpTransport> ApplicationOnlyGrant for ApplicationOnlyGrantImpl<T> {
    async fn request_token(&self, credentials: &Credentials) -> Result<TokenData, RedditAuthError> {
        let request = self.build_request(credentials)?;
        exchange_token(self.transport.as_ref(), &request).await
    }
}

/// Mock application-only grant for testing.
#[derive(Default)]
pub struct MockApplicationOnlyGrant {
    outcomes: Mutex<VecDeque<Result<TokenData, RedditAuthError>>>,
    request_history: Mutex<Vec<AuthMethod>>,
}

impl MockApplicationOnlyGrant {
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

    /// Auth methods of past requests.
    pub fn get_request_history(&self) -> Vec<AuthMethod> {
        self.request_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ApplicationOnlyGrant for MockApplicationOnlyGrant {
    async fn request_token(&self, credentials: &Credentials) -> Result<TokenData, RedditAuthError> {
        self.request_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(credentials.auth_method());

        let queued = self
            .outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        queued.unwrap_or_else(|| {
            Ok(TokenData::new(
                "mock-application-only-token",
                "bearer",
                3600,
                vec!["*".to_string()],
                None,
            ))
        })
    }
}

/// Create mock application-only grant for testing.
pub fn create_mock_application_only_grant() -> MockApplicationOnlyGrant {
    MockApplicationOnlyGrant::new()
}
