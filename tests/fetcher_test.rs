//! Integration tests for the paginated certificate fetcher

#[path = "common/mod.rs"]
mod common;

use common::*;
use epc_fetch::auth::AuthHeader;
use epc_fetch::errors::AppError;
use epc_fetch::fetcher::{CertificateFetcher, FetchOptions};
use epc_fetch::models::Endpoint;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(options: FetchOptions) -> CertificateFetcher {
    CertificateFetcher::new(
        reqwest::Client::new(),
        AuthHeader::basic(&test_credentials()),
        options,
    )
}

fn domestic_url(server: &MockServer) -> Url {
    Endpoint::Domestic.search_url(&server.uri()).unwrap()
}

async fn mount_page(server: &MockServer, page: &str, first: usize, count: usize) {
    Mock::given(method("GET"))
        .and(path("/domestic/search"))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(first, count)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_follows_full_pages_until_short_page() {
    let server = MockServer::start().await;
    mount_page(&server, "0", 0, 100).await;
    mount_page(&server, "1", 100, 100).await;
    mount_page(&server, "2", 200, 37).await;

    let rows = fetcher(FetchOptions::default())
        .fetch_certificates(&domestic_url(&server), "SW1A 1AA")
        .await
        .unwrap()
        .rows;

    assert_eq!(rows.len(), 237);
    assert_eq!(rows[0]["uprn"], "0");
    assert_eq!(rows[100]["uprn"], "100");
    assert_eq!(rows[236]["uprn"], "236");
    assert_eq!(requested_pages(&server).await, vec!["0", "1", "2"]);
}

#[tokio::test]
async fn test_fetch_empty_first_page_issues_one_request() {
    let server = MockServer::start().await;
    mount_page(&server, "0", 0, 0).await;

    let rows = fetcher(FetchOptions::default())
        .fetch_certificates(&domestic_url(&server), "ZZ99 9ZZ")
        .await
        .unwrap()
        .rows;

    assert!(rows.is_empty());
    assert_eq!(requested_pages(&server).await, vec!["0"]);
}

#[tokio::test]
async fn test_fetch_full_last_page_triggers_one_more_request() {
    let server = MockServer::start().await;
    mount_page(&server, "0", 0, 100).await;
    mount_page(&server, "1", 100, 0).await;

    let rows = fetcher(FetchOptions::default())
        .fetch_certificates(&domestic_url(&server), "SW1A 1AA")
        .await
        .unwrap()
        .rows;

    assert_eq!(rows.len(), 100);
    assert_eq!(requested_pages(&server).await, vec!["0", "1"]);
}

#[tokio::test]
async fn test_fetch_keeps_requesting_while_pages_are_full() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domestic/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, 100)))
        .mount(&server)
        .await;

    let options = FetchOptions {
        page_size: 100,
        max_pages: Some(7),
    };
    let rows = fetcher(options)
        .fetch_certificates(&domestic_url(&server), "SW1A 1AA")
        .await
        .unwrap()
        .rows;

    // The API never signals the end, so only the cap stops the loop.
    assert_eq!(rows.len(), 700);
    assert_eq!(
        requested_pages(&server).await,
        vec!["0", "1", "2", "3", "4", "5", "6"]
    );
}

#[tokio::test]
async fn test_fetch_sends_query_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domestic/search"))
        .and(query_param("postcode", "SW1A 1AA"))
        .and(query_param("page", "0"))
        .and(query_param("size", "25"))
        .and(header("authorization", expected_auth().as_str()))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(0, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let options = FetchOptions {
        page_size: 25,
        max_pages: None,
    };
    let rows = fetcher(options)
        .fetch_certificates(&domestic_url(&server), "SW1A 1AA")
        .await
        .unwrap()
        .rows;

    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn test_fetch_unauthorized_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = fetcher(FetchOptions::default())
        .fetch_certificates(&domestic_url(&server), "SW1A 1AA")
        .await;

    match result {
        Err(AppError::Network(msg)) => assert!(msg.contains("HTTP 401")),
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_server_error_mid_pagination_is_not_retried() {
    let server = MockServer::start().await;
    mount_page(&server, "0", 0, 100).await;
    Mock::given(method("GET"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = fetcher(FetchOptions::default())
        .fetch_certificates(&domestic_url(&server), "SW1A 1AA")
        .await;

    assert!(matches!(result, Err(AppError::Network(msg)) if msg.contains("HTTP 503")));
    assert_eq!(requested_pages(&server).await, vec!["0", "1"]);
}

#[tokio::test]
async fn test_fetch_unparseable_body_is_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let rows = fetcher(FetchOptions::default())
        .fetch_certificates(&domestic_url(&server), "SW1A 1AA")
        .await
        .unwrap()
        .rows;

    assert!(rows.is_empty());
    assert_eq!(requested_pages(&server).await, vec!["0"]);
}

#[tokio::test]
async fn test_fetch_passes_duplicate_rows_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "rows": [certificate(5), certificate(5)]
        })))
        .mount(&server)
        .await;

    let rows = fetcher(FetchOptions::default())
        .fetch_certificates(&domestic_url(&server), "SW1A 1AA")
        .await
        .unwrap()
        .rows;

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], rows[1]);
}

#[tokio::test]
async fn test_fetch_counts_non_object_rows_across_pages() {
    let server = MockServer::start().await;
    let mut first_page: Vec<serde_json::Value> = (0..98).map(certificate).collect();
    first_page.push(serde_json::json!("not a row"));
    first_page.push(serde_json::Value::Null);
    Mock::given(method("GET"))
        .and(query_param("page", "0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "rows": first_page })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "rows": [certificate(98), 7]
        })))
        .mount(&server)
        .await;

    let fetched = fetcher(FetchOptions::default())
        .fetch_certificates(&domestic_url(&server), "SW1A 1AA")
        .await
        .unwrap();

    assert_eq!(fetched.rows.len(), 99);
    assert_eq!(fetched.skipped, 3);
    assert_eq!(requested_pages(&server).await, vec!["0", "1"]);
}
