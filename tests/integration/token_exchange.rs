//! Integration tests for token acquisition and renewal

use super::*;
use reddit_oauth::{
    AuthError, AuthManager, Credentials, RedditAuthError, ReqwestHttpTransport, TransportError,
    DO_NOT_TRACK_DEVICE_ID,
};
use std::sync::Arc;
use wiremock::matchers::body_string;
use wiremock::ResponseTemplate;

fn manager(server: &MockServer, credentials: Credentials) -> AuthManager<ReqwestHttpTransport> {
    let config = mock_config(server);
    let transport = Arc::new(ReqwestHttpTransport::new(&config).unwrap());
    AuthManager::new(&config, credentials, transport)
}

fn web_app() -> Credentials {
    Credentials::web_app("client", "secret", "https://example.com/cb").unwrap()
}

#[tokio::test]
async fn test_refresh_token_exchange() {
    let server = setup_mock_server().await;

    token_endpoint_mock()
        .and(body_string("grant_type=refresh_token&refresh_token=r-1"))
        .respond_with(token_response("T", None))
        .expect(1)
        .mount(&server)
        .await;

    let mut manager = manager(&server, web_app());
    manager.set_refresh_token(Some("r-1".to_string()));

    let data = manager.renew().await.unwrap();
    assert_eq!(data.access_token(), "T");
    assert_eq!(data.scope(), ["identity", "read"]);
    assert_eq!(manager.access_token().unwrap(), "T");
    assert_eq!(manager.refresh_token(), Some("r-1"));
    assert!(!manager.needs_renewing());
}

#[tokio::test]
async fn test_refresh_token_rotation() {
    let server = setup_mock_server().await;

    token_endpoint_mock()
        .and(body_string("grant_type=refresh_token&refresh_token=r-1"))
        .respond_with(token_response("T", Some("r-2")))
        .mount(&server)
        .await;

    let mut manager = manager(&server, web_app());
    manager.set_refresh_token(Some("r-1".to_string()));

    manager.renew().await.unwrap();
    assert_eq!(manager.refresh_token(), Some("r-2"));
}

#[tokio::test]
async fn test_rejected_client_credentials() {
    let server = setup_mock_server().await;

    token_endpoint_mock()
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"message\": \"Unauthorized\"}"))
        .mount(&server)
        .await;

    let mut manager = manager(&server, web_app());
    manager.set_refresh_token(Some("r-1".to_string()));

    let error = manager.renew().await.unwrap_err();
    assert!(matches!(
        error,
        RedditAuthError::Auth(AuthError::InvalidClientCredentials { .. })
    ));
    assert_eq!(error.status(), Some(401));
    assert!(manager.current().is_none());
    assert_eq!(manager.refresh_token(), Some("r-1"));
}

#[tokio::test]
async fn test_server_error_surfaces_status() {
    let server = setup_mock_server().await;

    token_endpoint_mock()
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut manager = manager(&server, web_app());
    manager.set_refresh_token(Some("r-1".to_string()));

    let error = manager.renew().await.unwrap_err();
    assert!(matches!(
        error,
        RedditAuthError::Transport(TransportError::Status { status: 500, .. })
    ));
    assert!(error.is_retryable());
}

#[tokio::test]
async fn test_redirect_from_token_endpoint_surfaces_status() {
    let server = setup_mock_server().await;

    token_endpoint_mock()
        .respond_with(ResponseTemplate::new(302).insert_header("location", "https://example.com/"))
        .mount(&server)
        .await;

    let mut manager = manager(&server, web_app());
    manager.set_refresh_token(Some("r-1".to_string()));

    let error = manager.renew().await.unwrap_err();
    assert!(matches!(
        error,
        RedditAuthError::Transport(TransportError::Status { status: 302, .. })
    ));
    assert!(manager.current().is_none());
    assert_eq!(manager.refresh_token(), Some("r-1"));
}

#[tokio::test]
async fn test_script_password_grant() {
    let server = setup_mock_server().await;

    token_endpoint_mock()
        .and(body_string("grant_type=password&username=bot&password=p%26ss"))
        .respond_with(token_response("script-token", None))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = Credentials::script("bot", "p&ss", "client", "secret").unwrap();
    let mut manager = manager(&server, credentials);

    assert_eq!(manager.valid_access_token().await.unwrap(), "script-token");
    // Still valid, no second request
    assert_eq!(manager.valid_access_token().await.unwrap(), "script-token");
}

#[tokio::test]
async fn test_installed_client_grant() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(header("Authorization", "Basic Y2xpZW50Og=="))
        .and(body_string(
            "grant_type=https%3A%2F%2Foauth.reddit.com%2Fgrants%2Finstalled_client&device_id=DO_NOT_TRACK_THIS_DEVICE",
        ))
        .respond_with(token_response("app-token", None))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = Credentials::userless_app("client", DO_NOT_TRACK_DEVICE_ID).unwrap();
    let mut manager = manager(&server, credentials);

    let data = manager.renew().await.unwrap();
    assert_eq!(data.access_token(), "app-token");
}
