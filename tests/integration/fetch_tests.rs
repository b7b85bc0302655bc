//! HTTP fetcher tests against a mock origin site

use std::time::Duration;
use tatce_crawler::config::{CrawlerConfig, UserAgentConfig};
use tatce_crawler::crawler::{FetchFailure, FetchMode, FetchResult, HttpFetcher, PageFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn fetcher(timeout_secs: u64) -> HttpFetcher {
    let crawler = CrawlerConfig {
        request_timeout_secs: timeout_secs,
        ..CrawlerConfig::default()
    };
    HttpFetcher::new(&UserAgentConfig::default(), &crawler).unwrap()
}

/// Full value of a request header, with repeated values joined back together
fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers
        .iter()
        .find(|(header, _)| header.as_str().eq_ignore_ascii_case(name))
        .map(|(_, values)| {
            values
                .iter()
                .map(|value| value.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        })
}

#[tokio::test]
async fn test_fetch_text_sends_user_agent() {
    let server = MockServer::start().await;

    // The default user agent contains a comma, so it is checked on the
    // received request rather than with a header matcher
    Mock::given(method("GET"))
        .and(path("/aktuality"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>Obec Tatce</body></html>")
                .insert_header("Content-Type", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/aktuality", server.uri());
    let result = fetcher(5).fetch(&url, FetchMode::Text).await;

    assert_eq!(
        result,
        FetchResult::Text {
            body: "<html><body>Obec Tatce</body></html>".to_string(),
        }
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        header_value(&requests[0], "user-agent").as_deref(),
        Some(UserAgentConfig::default().header.as_str())
    );
}

/// "Úřední deska" in windows-1250
fn windows_1250_page(head: &str) -> Vec<u8> {
    let html = format!("<html><head>{}</head><body>Úřední deska</body></html>", head);
    let (encoded, _, _) = encoding_rs::WINDOWS_1250.encode(&html);
    encoded.into_owned()
}

#[tokio::test]
async fn test_fetch_decodes_header_charset() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/deska"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(windows_1250_page(""))
                .insert_header("Content-Type", "text/html; charset=windows-1250"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/deska", server.uri());
    let body = fetcher(5).fetch(&url, FetchMode::Text).await.into_text().unwrap();

    assert!(body.contains("Úřední deska"));
}

#[tokio::test]
async fn test_fetch_decodes_meta_charset_without_header_charset() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/deska"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(windows_1250_page(r#"<meta charset="windows-1250">"#))
                .insert_header("Content-Type", "text/html"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/deska", server.uri());
    let body = fetcher(5).fetch(&url, FetchMode::Text).await.into_text().unwrap();

    assert!(body.contains("Úřední deska"));
}

#[tokio::test]
async fn test_fetch_binary() {
    let server = MockServer::start().await;
    let bytes = vec![0x25, 0x50, 0x44, 0x46, 0xff, 0x00];

    Mock::given(method("GET"))
        .and(path("/files/a.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.clone()))
        .mount(&server)
        .await;

    let url = format!("{}/files/a.pdf", server.uri());
    let result = fetcher(5).fetch(&url, FetchMode::Binary).await;

    assert_eq!(result.into_bytes().unwrap(), bytes);
}

#[tokio::test]
async fn test_fetch_not_found() {
    let server = MockServer::start().await;
    let url = format!("{}/missing", server.uri());

    let result = fetcher(5).fetch(&url, FetchMode::Text).await;

    assert_eq!(
        result,
        FetchResult::Failure(FetchFailure::Status {
            url: url.clone(),
            status: 404,
        })
    );
}

#[tokio::test]
async fn test_fetch_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let url = format!("{}/slow", server.uri());
    let failure = fetcher(1).fetch(&url, FetchMode::Text).await.into_text().unwrap_err();

    assert_eq!(failure, FetchFailure::Timeout { url });
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    // Nothing listens on port 1
    let url = "http://127.0.0.1:1/gone".to_string();

    let failure = fetcher(2).fetch(&url, FetchMode::Text).await.into_text().unwrap_err();

    assert!(matches!(failure, FetchFailure::Transport { .. }));
    assert_eq!(failure.url(), url);
}
