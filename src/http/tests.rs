//! Tests for the HTTP client module

use super::*;
use crate::endpoint::{JsonEndpoint, RequestSpec};
use crate::error::Error;
use crate::retry::{Outcome, RetryPolicy};
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_policy() -> RetryPolicy {
    RetryPolicy::default().with_backoff(Duration::from_millis(10), 2.0)
}

fn client_for(server: &MockServer) -> Client {
    let config = ClientConfig::builder()
        .base_url(server.uri())
        .access_token("figd_test")
        .timeout(Duration::from_millis(200))
        .retry(fast_policy())
        .build();
    Client::new(config).unwrap()
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_client_config_default() {
    let config = ClientConfig::default();
    assert_eq!(config.base_url, "https://api.figma.com/v1/");
    assert_eq!(config.auth_header, "X-Figma-Token");
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.retry, RetryPolicy::default());
    assert!(config.access_token.is_none());
    assert!(config.user_agent.starts_with("figma-client/"));
}

#[test]
fn test_client_config_builder() {
    let config = ClientConfig::builder()
        .base_url("https://example.com/api")
        .access_token("token")
        .auth_header("Authorization")
        .timeout(Duration::from_secs(5))
        .retry(RetryPolicy::no_retry())
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url, "https://example.com/api");
    assert_eq!(config.access_token.as_deref(), Some("token"));
    assert_eq!(config.auth_header, "Authorization");
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.retry.max_attempts, 1);
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_client_config_debug_redacts_token() {
    let config = ClientConfig::figma("figd_secret");
    let debug_str = format!("{config:?}");
    assert!(debug_str.contains("<redacted>"));
    assert!(!debug_str.contains("figd_secret"));
}

#[test]
fn test_client_rejects_bad_base_url() {
    let config = ClientConfig::builder().base_url("not a url").build();
    assert!(matches!(Client::new(config), Err(Error::InvalidUrl(_))));
}

#[test]
fn test_client_rejects_bad_header() {
    let config = ClientConfig::builder().access_token("line\nbreak").build();
    assert!(matches!(Client::new(config), Err(Error::Config { .. })));
}

#[test]
fn test_build_url() {
    let client = Client::figma("t").unwrap();
    assert_eq!(
        client.build_url("files/abc").unwrap().as_str(),
        "https://api.figma.com/v1/files/abc"
    );
    assert_eq!(
        client.build_url("/files/abc").unwrap().as_str(),
        "https://api.figma.com/v1/files/abc"
    );
    assert_eq!(
        client.build_url("https://other.example/x").unwrap().as_str(),
        "https://other.example/x"
    );

    let config = ClientConfig::builder()
        .base_url("https://api.figma.com/v1")
        .build();
    let client = Client::new(config).unwrap();
    assert_eq!(
        client.build_url("me").unwrap().as_str(),
        "https://api.figma.com/v1/me"
    );
}

#[test]
fn test_client_debug() {
    let client = Client::figma("figd_secret").unwrap();
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("Client"));
    assert!(debug_str.contains("config"));
    assert!(!debug_str.contains("figd_secret"));
}

// ============================================================================
// Single attempts
// ============================================================================

#[tokio::test]
async fn test_request_sends_token_and_decodes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/abc"))
        .and(header("X-Figma-Token", "figd_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Design System"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let file: Value = client
        .request(&JsonEndpoint::get("files/abc"))
        .await
        .unwrap();

    assert_eq!(file["name"], "Design System");
}

#[tokio::test]
async fn test_request_query_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/abc/nodes"))
        .and(query_param("ids", "1:2"))
        .and(header("X-Request-Id", "req-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let endpoint = JsonEndpoint::<Value>::new(
        RequestSpec::get("files/abc/nodes")
            .query("ids", "1:2")
            .header("X-Request-Id", "req-1"),
    );

    client.request(&endpoint).await.unwrap();
}

#[tokio::test]
async fn test_execute_once_classifies_rate_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "120"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let outcome = client
        .execute_once(&JsonEndpoint::<Value>::get("files/abc"))
        .await;

    assert!(matches!(
        outcome,
        Outcome::RateLimited { retry_after } if retry_after == Duration::from_secs(120)
    ));
}

#[tokio::test]
async fn test_execute_once_rate_limit_without_header_uses_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let outcome = client
        .execute_once(&JsonEndpoint::<Value>::get("files/abc"))
        .await;

    assert!(matches!(
        outcome,
        Outcome::RateLimited { retry_after } if retry_after == DEFAULT_RETRY_AFTER
    ));
}

#[tokio::test]
async fn test_single_request_surfaces_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .request(&JsonEndpoint::<Value>::get("files/abc"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RateLimited { .. }));
    assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
}

#[tokio::test]
async fn test_execute_once_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let outcome = client
        .execute_once(&JsonEndpoint::<Value>::get("files/slow"))
        .await;

    assert!(matches!(
        outcome,
        Outcome::Timeout { timeout } if timeout == Duration::from_millis(200)
    ));
}

#[tokio::test]
async fn test_execute_once_connection_refused_is_failure() {
    let config = ClientConfig::builder()
        .base_url("http://127.0.0.1:1")
        .timeout(Duration::from_secs(2))
        .build();
    let client = Client::new(config).unwrap();

    let outcome = client
        .execute_once(&JsonEndpoint::<Value>::get("files/abc"))
        .await;

    assert!(matches!(outcome, Outcome::Failed(Error::Http(_))));
}

// ============================================================================
// Retrying requests
// ============================================================================

#[tokio::test]
async fn test_retry_after_rate_limit_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/abc"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "0")
                .set_body_string("Rate limited"),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let body: Value = client
        .request_with_retry(&JsonEndpoint::get("files/abc"))
        .await
        .unwrap();

    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_retry_after_over_ceiling_aborts_immediately() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "600"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let started = std::time::Instant::now();
    let err = client
        .request_with_retry(&JsonEndpoint::<Value>::get("files/abc"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RateLimitExceeded { .. }));
    assert_eq!(err.retry_after(), Some(Duration::from_secs(600)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_retry_after_beyond_duration_range_aborts_immediately() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(429).insert_header("Retry-After", "99999999999999999999"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let started = std::time::Instant::now();
    let err = client
        .request_with_retry(&JsonEndpoint::<Value>::get("files/abc"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RateLimitExceeded { .. }));
    assert_eq!(err.retry_after(), Some(Duration::MAX));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_custom_ceiling_applies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "2"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let policy = fast_policy().with_max_retry_after(Duration::from_secs(1));
    let err = client
        .request_with_policy(&JsonEndpoint::<Value>::get("files/abc"), &policy)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RateLimitExceeded { .. }));
}

#[tokio::test]
async fn test_timeouts_exhaust_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .request_with_retry(&JsonEndpoint::<Value>::get("files/slow"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { timeout_ms: 200 }));
}

#[tokio::test]
async fn test_timeout_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let body: Value = client.get_json("files/abc").await.unwrap();

    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_server_error_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .request_with_retry(&JsonEndpoint::<Value>::get("files/abc"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 500, ref body } if body == "Server error"));
}

#[tokio::test]
async fn test_decode_failure_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .request_with_retry(&JsonEndpoint::<Value>::get("files/abc"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::JsonParse(_)));
}

#[tokio::test]
async fn test_cancellation_interrupts_rate_limit_wait() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "120"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let err = client
        .request_with_retry_cancellable(
            &JsonEndpoint::<Value>::get("files/abc"),
            client.retry_policy(),
            &token,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn test_cancellation_interrupts_in_flight_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::builder()
        .base_url(mock_server.uri())
        .timeout(Duration::from_secs(30))
        .build();
    let client = Client::new(config).unwrap();
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let err = client
        .request_with_retry_cancellable(
            &JsonEndpoint::<Value>::get("files/slow"),
            &RetryPolicy::default(),
            &token,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn test_concurrent_calls_share_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "1"})))
        .expect(5)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut handles = Vec::new();
    for _ in 0..5 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.get_json::<Value>("me").await
        }));
    }

    for handle in handles {
        let body = handle.await.unwrap().unwrap();
        assert_eq!(body["id"], "1");
    }
}
