//! HTTP Transport
//!
//! HTTP execution interface and implementations.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::core::request::HttpRequest;
use crate::error::{ConfigurationError, ProtocolError, RedditAuthError, TransportError};
use crate::types::{RedditAuthConfig, DEFAULT_MAX_RESPONSE_SIZE};

/// HTTP response definition.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Status text.
    pub status_text: String,
    /// Response headers, names lowercased.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: String::new(),
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// A response carrying a JSON body.
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        let mut response = Self::new(status, body.to_string());
        response
            .headers
            .insert("content-type".to_string(), "application/json".to_string());
        response
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Deserialize the JSON body.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, RedditAuthError> {
        serde_json::from_str(&self.body).map_err(|e| {
            RedditAuthError::Protocol(ProtocolError::InvalidJson {
                message: e.to_string(),
            })
        })
    }
}

/// HTTP transport interface (for dependency injection).
///
/// A non-2xx status is not an error at this level; implementations return the
/// response and let the caller classify it.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RedditAuthError>;
}

/// Default reqwest-based HTTP transport.
pub struct ReqwestHttpTransport {
    client: reqwest::Client,
    default_timeout: Duration,
    max_response_size: usize,
}

impl ReqwestHttpTransport {
    /// Create transport from client configuration.
    pub fn new(config: &RedditAuthConfig) -> Result<Self, RedditAuthError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| {
                RedditAuthError::Configuration(ConfigurationError::InvalidConfig {
                    message: format!("failed to create HTTP client: {}", e),
                })
            })?;

        Ok(Self {
            client,
            default_timeout: config.timeout,
            max_response_size: config.max_response_size,
        })
    }

    /// Create transport with custom options.
    pub fn with_options(timeout: Duration, max_response_size: usize) -> Result<Self, RedditAuthError> {
        Self::new(&RedditAuthConfig {
            timeout,
            max_response_size,
            ..RedditAuthConfig::default()
        })
    }

    fn build_request(&self, request: &HttpRequest) -> Result<reqwest::RequestBuilder, RedditAuthError> {
        let method = reqwest::Method::from_bytes(request.method().as_str().as_bytes()).map_err(|_| {
            RedditAuthError::Configuration(ConfigurationError::InvalidConfig {
                message: format!("invalid HTTP method: {}", request.method()),
            })
        })?;

        let mut req_builder = self.client.request(method, request.url());

        for (key, value) in request.headers() {
            req_builder = req_builder.header(key.as_str(), value.as_str());
        }

        if let Some(body) = request.body() {
            if request.header("content-type").is_none() {
                if let Some(content_type) = body.content_type() {
                    req_builder = req_builder.header(reqwest::header::CONTENT_TYPE, content_type);
                }
            }
            req_builder = req_builder.body(body.to_bytes());
        }

        if let Some(auth) = request.basic_auth() {
            req_builder = req_builder.header(reqwest::header::AUTHORIZATION, auth.header_value());
        }

        Ok(req_builder.timeout(request.timeout().unwrap_or(self.default_timeout)))
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RedditAuthError> {
        let timeout = request.timeout().unwrap_or(self.default_timeout);

        let response = self.build_request(request)?.send().await.map_err(|e| {
            if e.is_timeout() {
                RedditAuthError::Transport(TransportError::Timeout { timeout })
            } else {
                RedditAuthError::Transport(TransportError::ConnectionFailed {
                    message: e.to_string(),
                })
            }
        })?;

        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("")
            .to_string();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.as_str().to_lowercase(), v.to_string());
            }
        }

        if let Some(len) = response.content_length() {
            if exceeds_limit(len, self.max_response_size) {
                return Err(RedditAuthError::Protocol(ProtocolError::ResponseTooLarge {
                    size: usize::try_from(len).unwrap_or(usize::MAX),
                }));
            }
        }

        let body = response.text().await.map_err(|e| {
            RedditAuthError::Protocol(ProtocolError::InvalidResponse {
                message: e.to_string(),
            })
        })?;

        if body.len() > self.max_response_size {
            return Err(RedditAuthError::Protocol(ProtocolError::ResponseTooLarge {
                size: body.len(),
            }));
        }

        Ok(HttpResponse {
            status,
            status_text,
            headers,
            body,
        })
    }
}

/// Declared length above the cap, including lengths `usize` cannot hold.
fn exceeds_limit(len: u64, max_response_size: usize) -> bool {
    usize::try_from(len).map_or(true, |len| len > max_response_size)
}

/// Mock HTTP transport for testing.
///
/// Queued outcomes are returned in the order they were queued.
#[derive(Default)]
pub struct MockHttpTransport {
    outcomes: Mutex<VecDeque<Result<HttpResponse, RedditAuthError>>>,
    request_history: Mutex<Vec<HttpRequest>>,
    default_response: Mutex<Option<HttpResponse>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockHttpTransport {
    /// Create new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response to return.
    pub fn queue_response(&self, response: HttpResponse) -> &Self {
        lock(&self.outcomes).push_back(Ok(response));
        self
    }

    /// Queue a JSON response.
    pub fn queue_json_response(&self, status: u16, body: serde_json::Value) -> &Self {
        self.queue_response(HttpResponse::json(status, &body))
    }

    /// Queue a transport failure.
    pub fn queue_error(&self, error: RedditAuthError) -> &Self {
        lock(&self.outcomes).push_back(Err(error));
        self
    }

    /// Set default response when queue is empty.
    pub fn set_default_response(&self, response: HttpResponse) -> &Self {
        *lock(&self.default_response) = Some(response);
        self
    }

    /// Get request history.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        lock(&self.request_history).clone()
    }

    /// Get last request.
    pub fn get_last_request(&self) -> Option<HttpRequest> {
        lock(&self.request_history).last().cloned()
    }

    /// Clear request history.
    pub fn clear_history(&self) {
        lock(&self.request_history).clear();
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RedditAuthError> {
        lock(&self.request_history).push(request.clone());

        if let Some(outcome) = lock(&self.outcomes).pop_front() {
            return outcome;
        }

        lock(&self.default_response).clone().ok_or_else(|| {
            RedditAuthError::Transport(TransportError::ConnectionFailed {
                message: "No mock response available".to_string(),
            })
        })
    }
}

/// Create production HTTP transport.
pub fn create_transport(timeout: Option<Duration>) -> Result<ReqwestHttpTransport, RedditAuthError> {
    ReqwestHttpTransport::with_options(
        timeout.unwrap_or(RedditAuthConfig::default().timeout),
        DEFAULT_MAX_RESPONSE_SIZE,
    )
}

/// Create mock HTTP transport for testing.
pub fn create_mock_transport() -> MockHttpTransport {
    MockHttpTransport::new()
}
