//! Integration tests for the reqwest transport

use super::*;
use reddit_oauth::{
    dispatch, HttpRequest, HttpTransport, ProtocolError, RedditAuthError, ReqwestHttpTransport,
    TransportError, DEFAULT_USER_AGENT,
};
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn transport() -> ReqwestHttpTransport {
    ReqwestHttpTransport::new(&RedditAuthConfig::default()).expect("transport")
}

#[tokio::test]
async fn test_sends_method_query_headers_and_form() {
    let server = setup_mock_server().await;

    Mock::given(method("PATCH"))
        .and(path("/api/widgets/42"))
        .and(query_param("q", "hello world"))
        .and(header("X-Custom", "1"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string("name=a+b&size=3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let request = HttpRequest::builder()
        .secure(false)
        .host(server.address().to_string())
        .path_with_params("/api/widgets/{id}", ["42"])
        .query_param("q", "hello world")
        .header("X-Custom", "1")
        .method_with_form(" patch ", [("name", "a b"), ("size", "3")])
        .build()
        .unwrap();

    let response = transport().send(&request).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_basic_auth_header() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/secure"))
        .and(header("Authorization", CLIENT_BASIC_AUTH))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let request = HttpRequest::builder()
        .url(format!("{}/secure", server.uri()))
        .basic_auth("client", "secret")
        .build()
        .unwrap();

    let response = transport().send(&request).await.unwrap();
    assert!(response.is_success());
}

#[tokio::test]
async fn test_non_success_status_is_returned() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).insert_header("retry-after", "10"))
        .mount(&server)
        .await;

    let request = HttpRequest::builder().url(server.uri()).build().unwrap();
    let response = transport().send(&request).await.unwrap();

    assert_eq!(response.status, 503);
    assert!(!response.is_success());
    assert_eq!(response.header("Retry-After"), Some("10"));
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "https://example.com/"))
        .mount(&server)
        .await;

    let request = HttpRequest::builder().url(server.uri()).build().unwrap();
    let response = transport().send(&request).await.unwrap();

    assert_eq!(response.status, 302);
    assert!(!response.is_success());
    assert_eq!(response.header("Location"), Some("https://example.com/"));
}

#[tokio::test]
async fn test_redirect_routes_to_failure_handler() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "https://example.com/"))
        .mount(&server)
        .await;

    let seen = Arc::new(AtomicU16::new(0));
    let recorder = seen.clone();
    let request = HttpRequest::builder()
        .url(server.uri())
        .failure(move |response| recorder.store(response.status, Ordering::SeqCst))
        .build()
        .unwrap();

    let outcome = dispatch(&transport(), request).await;
    assert!(outcome.is_handled());
    assert_eq!(seen.load(Ordering::SeqCst), 302);
}

#[tokio::test]
async fn test_default_user_agent() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(header("User-Agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let request = HttpRequest::builder().url(server.uri()).build().unwrap();
    assert!(transport().send(&request).await.unwrap().is_success());
}

#[tokio::test]
async fn test_response_size_cap() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
        .mount(&server)
        .await;

    let transport = ReqwestHttpTransport::with_options(Duration::from_secs(5), 16).unwrap();
    let request = HttpRequest::builder().url(server.uri()).build().unwrap();

    assert!(matches!(
        transport.send(&request).await,
        Err(RedditAuthError::Protocol(ProtocolError::ResponseTooLarge { .. }))
    ));
}

#[tokio::test]
async fn test_request_timeout() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let request = HttpRequest::builder()
        .url(server.uri())
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let result = transport().send(&request).await;

    assert!(matches!(
        result,
        Err(RedditAuthError::Transport(TransportError::Timeout { .. }))
    ));
    assert!(result.unwrap_err().is_retryable());
}
