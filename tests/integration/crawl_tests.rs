//! End-to-end crawl tests against a mock site and a mock OCR API

use crate::common::{create_test_config, listing_html, ocr_success, LISTING_PATH};
use tatce_crawler::crawler::{run_crawl, InterruptSignal};
use tatce_crawler::output::load_results;
use tatce_crawler::{CompletionReason, CrawlPhase, NOT_AVAILABLE};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIRST_ARTICLE: &str = "/prakticke-info/aktuality/uzavirka-silnice";
const SECOND_ARTICLE: &str = "/prakticke-info/aktuality/presunuto";

fn full_article() -> String {
    r#"<!DOCTYPE html><html><head><title>Uzavírka | Obec Tatce</title></head><body>
    <div id="gcm-main">
        <h1>Uzavírka silnice III/1133</h1>
        <div class="event-info">
            <span class="event-info-value">12. 3. 2024</span>
        </div>
        <div class="module_content">
            <p>Silnice bude od pondělí uzavřena.</p>
            <img src="/images/objizdka.jpg" alt="Objížďka">
            <img src="/images/druha.jpg" alt="Druhá">
            <p>Podrobnosti v <a href="/files/rozhodnuti.pdf">rozhodnutí</a>.</p>
        </div>
    </div>
    </body></html>"#
        .to_string()
}

async fn mount_listing(server: &MockServer, pages: &[&[&str]]) {
    // Numbered pages are mounted first so they win over the bare listing path
    for (index, hrefs) in pages.iter().enumerate().skip(1) {
        Mock::given(method("GET"))
            .and(path(LISTING_PATH))
            .and(query_param("page", (index + 1).to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(hrefs)))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(pages[0])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_with_ocr() {
    let server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    mount_listing(&server, &[&[FIRST_ARTICLE, SECOND_ARTICLE], &[]]).await;

    Mock::given(method("GET"))
        .and(path(FIRST_ARTICLE))
        .respond_with(ResponseTemplate::new(200).set_body_string(full_article()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(SECOND_ARTICLE))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body><p>Stránka přesunuta</p></body></html>"),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/parse/image"))
        .and(body_string_contains("objizdka.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ocr_success(&["OBJÍŽĎKA PŘES PEČKY"])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/parse/image"))
        .and(body_string_contains("rozhodnuti.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ocr_success(&["Strana 1", "Strana 2"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &output_dir);
    let report = run_crawl(config, InterruptSignal::new()).await.unwrap();

    assert_eq!(
        report.outcome,
        CrawlPhase::Completed(CompletionReason::EndOfPagination)
    );
    assert_eq!(report.records.len(), 2);

    let first = &report.records[0];
    assert_eq!(first.url, format!("{}{}", server.uri(), FIRST_ARTICLE));
    assert_eq!(first.title, "Uzavírka silnice III/1133");
    assert_eq!(first.date, "12. 3. 2024");
    assert!(first.content.contains("Silnice bude od pondělí uzavřena."));

    assert_eq!(first.image_ocr_results.len(), 1);
    assert_eq!(
        first.image_ocr_results[0].image_url,
        format!("{}/images/objizdka.jpg", server.uri())
    );
    assert_eq!(first.image_ocr_results[0].ocr_text, "OBJÍŽĎKA PŘES PEČKY");

    assert_eq!(first.file_extractions.len(), 1);
    assert_eq!(first.file_extractions[0].link_text, "rozhodnutí");
    assert_eq!(
        first.file_extractions[0].extracted_text.as_deref(),
        Some("Strana 1\n---\nStrana 2")
    );

    let second = &report.records[1];
    assert_eq!(second.title, NOT_AVAILABLE);
    assert_eq!(second.date, NOT_AVAILABLE);
    assert_eq!(second.content, NOT_AVAILABLE);

    let saved_to = report.saved_to.clone().unwrap();
    assert_eq!(saved_to, output_dir.path().join("articles.json"));
    assert_eq!(load_results(&saved_to).unwrap(), report.records);
}

#[tokio::test]
async fn test_ocr_form_carries_configured_options() {
    let server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    mount_listing(&server, &[&[FIRST_ARTICLE], &[]]).await;

    Mock::given(method("GET"))
        .and(path(FIRST_ARTICLE))
        .respond_with(ResponseTemplate::new(200).set_body_string(full_article()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/parse/image"))
        .and(body_string_contains("language=cze"))
        .and(body_string_contains("apikey=test-key"))
        .and(body_string_contains("OCREngine=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ocr_success(&["text"])))
        .expect(2)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &output_dir);
    let report = run_crawl(config, InterruptSignal::new()).await.unwrap();

    assert_eq!(report.records[0].image_ocr_results[0].ocr_text, "text");
}

#[tokio::test]
async fn test_ocr_outage_degrades_to_diagnostics() {
    let server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    mount_listing(&server, &[&[FIRST_ARTICLE], &[]]).await;

    Mock::given(method("GET"))
        .and(path(FIRST_ARTICLE))
        .respond_with(ResponseTemplate::new(200).set_body_string(full_article()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/parse/image"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &output_dir);
    let report = run_crawl(config, InterruptSignal::new()).await.unwrap();

    let record = &report.records[0];
    assert_eq!(record.title, "Uzavírka silnice III/1133");
    assert!(record.image_ocr_results[0]
        .ocr_text
        .starts_with("OCR Error: Request failed for"));
    assert!(record.file_extractions[0]
        .extracted_text
        .as_deref()
        .unwrap()
        .ends_with("HTTP 503"));
}

#[tokio::test]
async fn test_windows_1250_article_is_decoded() {
    let server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    mount_listing(&server, &[&[FIRST_ARTICLE], &[]]).await;

    let html = r#"<html><body><div id="gcm-main"><h1>Příjem žádostí</h1>
        <div class="module_content"><p>Úřední hodiny</p></div></div></body></html>"#;
    let (encoded, _, _) = encoding_rs::WINDOWS_1250.encode(html);

    Mock::given(method("GET"))
        .and(path(FIRST_ARTICLE))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(encoded.into_owned())
                .insert_header("Content-Type", "text/html; charset=windows-1250"),
        )
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &output_dir);
    let report = run_crawl(config, InterruptSignal::new()).await.unwrap();

    assert_eq!(report.records[0].title, "Příjem žádostí");
    assert_eq!(report.records[0].content, "Úřední hodiny");
}

#[tokio::test]
async fn test_unavailable_listing_still_saves() {
    let server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &output_dir);
    let report = run_crawl(config, InterruptSignal::new()).await.unwrap();

    assert_eq!(
        report.outcome,
        CrawlPhase::Completed(CompletionReason::ListingUnavailable)
    );
    assert!(report.records.is_empty());

    let saved = load_results(&report.saved_to.unwrap()).unwrap();
    assert!(saved.is_empty());
}

#[tokio::test]
async fn test_missing_later_page_ends_crawl() {
    let server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    mount_listing(&server, &[&[FIRST_ARTICLE]]).await;

    Mock::given(method("GET"))
        .and(path(FIRST_ARTICLE))
        .respond_with(ResponseTemplate::new(200).set_body_string(full_article()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/parse/image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ocr_success(&["x"])))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &output_dir);
    let report = run_crawl(config, InterruptSignal::new()).await.unwrap();

    assert_eq!(
        report.outcome,
        CrawlPhase::Completed(CompletionReason::ListingUnavailable)
    );
    assert_eq!(report.records.len(), 1);
}

#[tokio::test]
async fn test_consecutive_runs_write_distinct_files() {
    let server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&[])))
        .mount(&server)
        .await;

    let first = run_crawl(
        create_test_config(&server.uri(), &output_dir),
        InterruptSignal::new(),
    )
    .await
    .unwrap();
    let second = run_crawl(
        create_test_config(&server.uri(), &output_dir),
        InterruptSignal::new(),
    )
    .await
    .unwrap();

    assert_eq!(
        first.outcome,
        CrawlPhase::Completed(CompletionReason::NothingFound)
    );
    assert_eq!(first.saved_to, Some(output_dir.path().join("articles.json")));
    assert_eq!(second.saved_to, Some(output_dir.path().join("articles_1.json")));
}

#[tokio::test]
async fn test_interrupted_before_start_saves_empty_document() {
    let server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&[FIRST_ARTICLE])))
        .expect(0)
        .mount(&server)
        .await;

    let interrupt = InterruptSignal::new();
    interrupt.trigger();

    let report = run_crawl(create_test_config(&server.uri(), &output_dir), interrupt)
        .await
        .unwrap();

    assert!(report.was_interrupted());
    assert!(load_results(&report.saved_to.unwrap()).unwrap().is_empty());
}
