//! Integration tests for the high-level client

use super::*;
use reddit_oauth::{Credentials, Outcome, RedditAuthClient, Unhandled};
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use wiremock::matchers::body_string;

#[tokio::test]
async fn test_execute_with_application_only_token() {
    let server = setup_mock_server().await;

    token_endpoint_mock()
        .and(body_string("grant_type=client_credentials"))
        .respond_with(token_response("app-token", None))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/rust/about"))
        .and(header("Authorization", "bearer app-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"kind": "t5"})))
        .expect(2)
        .mount(&server)
        .await;

    let credentials = Credentials::userless("client", "secret").unwrap();
    let mut client = RedditAuthClient::new(mock_config(&server), credentials).unwrap();

    for _ in 0..2 {
        let builder = client
            .request()
            .secure(false)
            .path_with_params("/r/{subreddit}/about", ["rust"]);
        let response = client.execute(builder).await.unwrap();
        let body: serde_json::Value = response.deserialize().unwrap();
        assert_eq!(body["kind"], "t5");
    }
}

#[tokio::test]
async fn test_dispatch_failure_handler() {
    let server = setup_mock_server().await;

    token_endpoint_mock()
        .respond_with(token_response("app-token", None))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/me"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let credentials = Credentials::userless("client", "secret").unwrap();
    let mut client = RedditAuthClient::new(mock_config(&server), credentials).unwrap();

    let seen = Arc::new(AtomicU16::new(0));
    let recorder = seen.clone();
    let builder = client
        .request()
        .secure(false)
        .path("/api/v1/me")
        .failure(move |response| recorder.store(response.status, Ordering::SeqCst));

    let outcome = client.dispatch(builder).await.unwrap();
    assert!(outcome.is_handled());
    assert_eq!(seen.load(Ordering::SeqCst), 403);

    let builder = client.request().secure(false).path("/api/v1/me");
    match client.dispatch(builder).await.unwrap() {
        Outcome::Unhandled(Unhandled::Failure(response)) => assert_eq!(response.status, 403),
        other => panic!("unexpected outcome: {:?}", other),
    }
}
