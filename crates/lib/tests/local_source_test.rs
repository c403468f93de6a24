//! # Local Source Tests
//!
//! Verifies that `HttpLocalSource` sends the expected query string and that
//! every failure mode collapses to an empty identifier set.

use moviesearch::providers::{build_http_client, HttpLocalSource, LocalSource};
use moviesearch_test_utils::init_tracing;
use std::time::Duration;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn local_source(server: &MockServer, timeout: Duration) -> HttpLocalSource {
    let client = build_http_client().expect("client builds");
    HttpLocalSource::new(client, format!("{}/movies/search", server.uri()), timeout)
}

#[tokio::test]
async fn test_fetch_ids_success() {
    init_tracing();
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movies/search"))
        .and(query_param("query", "Inception"))
        .and(query_param("includeAdult", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![27205, 99999, 27205]))
        .expect(1)
        .mount(&server)
        .await;

    // Act
    let ids = local_source(&server, Duration::from_secs(5))
        .fetch_ids("Inception", false)
        .await;

    // Assert
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&27205));
    assert!(ids.contains(&99999));
}

#[tokio::test]
async fn test_include_adult_flag_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("query", "Blue Velvet"))
        .and(query_param("includeAdult", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![793]))
        .expect(1)
        .mount(&server)
        .await;

    let ids = local_source(&server, Duration::from_secs(5))
        .fetch_ids("Blue Velvet", true)
        .await;

    assert!(ids.contains(&793));
}

#[tokio::test]
async fn test_server_error_yields_empty_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
        .mount(&server)
        .await;

    let ids = local_source(&server, Duration::from_secs(5))
        .fetch_ids("Inception", false)
        .await;

    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_malformed_body_yields_empty_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ids": [1, 2]}"#))
        .mount(&server)
        .await;

    let ids = local_source(&server, Duration::from_secs(5))
        .fetch_ids("Inception", false)
        .await;

    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_slow_source_times_out_to_empty_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(vec![27205])
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let ids = local_source(&server, Duration::from_millis(100))
        .fetch_ids("Inception", false)
        .await;

    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_unreachable_source_yields_empty_set() {
    let client = build_http_client().expect("client builds");
    let source = HttpLocalSource::new(client, "http://127.0.0.1:1/movies", Duration::from_secs(1));

    let ids = source.fetch_ids("Inception", false).await;

    assert!(ids.is_empty());
}
