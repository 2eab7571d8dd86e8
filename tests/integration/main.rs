//! Integration tests using WireMock
//!
//! These tests run the reqwest transport and the token manager against a mock
//! HTTP server, covering the wire format of requests and the mapping of
//! responses.

mod client;
mod token_exchange;
mod transport;

use reddit_oauth::{reddit_auth_config, RedditAuthConfig};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Basic credentials for `client:secret`.
pub const CLIENT_BASIC_AUTH: &str = "Basic Y2xpZW50OnNlY3JldA==";

/// Helper to create a mock server
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Configuration pointing both the token endpoint and the API host at the mock server.
pub fn mock_config(server: &MockServer) -> RedditAuthConfig {
    reddit_auth_config()
        .token_endpoint(format!("{}/api/v1/access_token", server.uri()))
        .oauth_host(server.address().to_string())
        .user_agent("test:reddit-oauth:v0.1.0")
        .build()
        .expect("valid mock config")
}

/// Token endpoint mock expecting the client's basic credentials.
pub fn token_endpoint_mock() -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(header("Authorization", CLIENT_BASIC_AUTH))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
}

/// Token body as reddit returns it.
pub fn token_response(access_token: &str, refresh_token: Option<&str>) -> ResponseTemplate {
    let mut body = serde_json::json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": 3600,
        "scope": "identity read"
    });
    if let Some(refresh_token) = refresh_token {
        body["refresh_token"] = serde_json::Value::from(refresh_token);
    }
    ResponseTemplate::new(200).set_body_json(body)
}
