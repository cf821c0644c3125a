//! Common test utilities for integration tests

use epc_fetch::auth::{AuthHeader, Credentials};
use epc_fetch::config::ResolvedConfig;
use serde_json::{json, Value};
use std::path::Path;
use wiremock::MockServer;

#[allow(dead_code)]
pub const TEST_EMAIL: &str = "tester@example.com";
#[allow(dead_code)]
pub const TEST_API_KEY: &str = "0123456789abcdef0123456789abcdef";

/// Credentials used by every mocked request
#[allow(dead_code)]
pub fn test_credentials() -> Credentials {
    Credentials::new(TEST_EMAIL, TEST_API_KEY).unwrap()
}

/// Expected `Authorization` header value for [`test_credentials`]
#[allow(dead_code)]
pub fn expected_auth() -> String {
    AuthHeader::basic(&test_credentials()).as_str().to_string()
}

/// A single certificate row shaped like the domestic search API output
#[allow(dead_code)]
pub fn certificate(uprn: usize) -> Value {
    json!({
        "lmk-key": format!("lmk-{uprn}"),
        "address1": format!("{uprn} Example Street"),
        "postcode": "SW1A 1AA",
        "current-energy-rating": "C",
        "uprn": uprn.to_string(),
    })
}

/// Search response body with `count` rows, uprns numbered from `first`
#[allow(dead_code)]
pub fn page_body(first: usize, count: usize) -> Value {
    let rows: Vec<Value> = (first..first + count).map(certificate).collect();
    json!({
        "column-names": ["lmk-key", "address1", "postcode", "current-energy-rating", "uprn"],
        "rows": rows,
    })
}

/// Config pointing at the mock server and writing below `output_dir`
#[allow(dead_code)]
pub fn test_config(server: &MockServer, output_dir: &Path) -> ResolvedConfig {
    ResolvedConfig {
        output_dir: output_dir.to_path_buf(),
        base_url: server.uri(),
        ..ResolvedConfig::default()
    }
}

/// Page indices of the requests the mock server received, in order
#[allow(dead_code)]
pub async fn requested_pages(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|req| {
            req.url
                .query_pairs()
                .find(|(k, _)| k == "page")
                .map(|(_, v)| v.into_owned())
                .unwrap()
        })
        .collect()
}
