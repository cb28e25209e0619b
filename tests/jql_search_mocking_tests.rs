//! HTTP mocking tests for the JQL search client
//!
//! These use wiremock for deterministic HTTP behavior, eliminating network
//! dependencies: success, decode failures, and transport failures are all
//! driven from canned responses.

use jira_kpis::{GatherError, HttpJqlCounter, JqlCounter};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn counter() -> HttpJqlCounter {
    HttpJqlCounter::new("user", "pass", HttpJqlCounter::DEFAULT_TIMEOUT).unwrap()
}

#[tokio::test]
async fn count_returns_the_total_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("jql", "project =X"))
        // base64("user:pass")
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"total": 5, "issues": []})),
        )
        .mount(&server)
        .await;

    let total = counter().count(&server.uri(), "project =X").await.unwrap();
    assert_eq!(total, 5);
}

#[tokio::test]
async fn misspelled_total_key_is_a_decode_error_not_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totale": 5})))
        .mount(&server)
        .await;

    let err = counter().count(&server.uri(), "q").await.unwrap_err();
    assert!(matches!(err, GatherError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = counter().count(&server.uri(), "q").await.unwrap_err();
    assert!(matches!(err, GatherError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn http_500_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = counter().count(&server.uri(), "q").await.unwrap_err();
    assert!(matches!(err, GatherError::Transport { .. }), "got {err:?}");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Discard port, nothing listens there.
    let err = counter().count("http://127.0.0.1:9", "q").await.unwrap_err();
    assert!(matches!(err, GatherError::Transport { .. }), "got {err:?}");
}

#[tokio::test]
async fn slow_response_times_out_as_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"total": 1}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let short = HttpJqlCounter::new("user", "pass", Duration::from_millis(200)).unwrap();
    let err = short.count(&server.uri(), "q").await.unwrap_err();
    assert!(matches!(err, GatherError::Transport { .. }), "got {err:?}");
}
