//! Mock server helpers for listing and archive downloads

use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::constants::*;

/// URL of the snapshot listing on the mock server
pub fn listing_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), LISTING_PATH)
}

/// URL of the release page on the mock server
pub fn releases_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), RELEASES_PATH)
}

/// Serve `body` as the snapshot listing
pub async fn mock_listing(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serve the release page
pub async fn mock_release_page(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path(RELEASES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serve an archive from the listing directory, expecting exactly
/// `expected_calls` downloads
pub async fn mock_archive(
    server: &MockServer,
    filename: &str,
    bytes: Vec<u8>,
    expected_calls: u64,
) {
    Mock::given(method("GET"))
        .and(path(format!("{}{}", LISTING_PATH, filename)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Serve an archive only after `delay`
pub async fn mock_delayed_archive(
    server: &MockServer,
    filename: &str,
    bytes: Vec<u8>,
    delay: Duration,
) {
    Mock::given(method("GET"))
        .and(path(format!("{}{}", LISTING_PATH, filename)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(bytes)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Respond to `route` with a bare status code
pub async fn mock_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Serve a launcher release artifact under `/download/<tag>/`
pub async fn mock_release_artifact(server: &MockServer, tag: &str, bytes: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(format!("/download/{}/{}", tag, RELEASE_ARTIFACT)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .expect(1)
        .mount(server)
        .await;
}
