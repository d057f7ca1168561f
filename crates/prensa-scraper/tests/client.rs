//! Integration tests for `PageClient` against a local `wiremock` server:
//! happy path, typed error mapping, retry behavior, and per-site headers.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use prensa_core::{DiscoveryMethod, SiteDescriptor};
use prensa_scraper::{PageClient, ScrapeError};

fn test_site() -> SiteDescriptor {
    SiteDescriptor {
        name: "Diario de Prueba".to_string(),
        base_url: "https://example.com".to_string(),
        method: DiscoveryMethod::Crawl,
        fallback_method: None,
        sitemaps: vec![],
        feeds: vec![],
        crawl_url: None,
        headers: std::collections::BTreeMap::new(),
        user_agent: None,
        max_articles: None,
        request_timeout_secs: None,
        ignore_gz: false,
        news_sitemap: false,
        default_author: None,
        byline_selectors: vec![],
        prefer_discovery_title: false,
    }
}

/// 5-second timeout, no retries.
fn test_client() -> PageClient {
    PageClient::new(5, 0, 0).expect("failed to build test PageClient")
}

#[tokio::test]
async fn fetch_text_returns_the_body_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/articulo"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>hola</html>"))
        .mount(&server)
        .await;

    let body = test_client()
        .fetch_text(&format!("{}/articulo", server.uri()), &test_site())
        .await
        .unwrap();
    assert_eq!(body, "<html>hola</html>");
}

#[tokio::test]
async fn not_found_maps_to_typed_error_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = PageClient::new(5, 3, 0).expect("client");
    let err = client
        .fetch_text(&format!("{}/desaparecido", server.uri()), &test_site())
        .await
        .unwrap_err();
    assert!(matches!(err, ScrapeError::NotFound { .. }), "{err:?}");
}

#[tokio::test]
async fn rate_limit_is_retried_then_surfaced_with_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .expect(3)
        .mount(&server)
        .await;

    let client = PageClient::new(5, 2, 0).expect("client");
    let err = client
        .fetch_text(&server.uri(), &test_site())
        .await
        .unwrap_err();
    match err {
        ScrapeError::RateLimited {
            retry_after_secs, ..
        } => assert_eq!(retry_after_secs, 7),
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_maps_to_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_client()
        .fetch_text(&server.uri(), &test_site())
        .await
        .unwrap_err();
    match err {
        ScrapeError::UnexpectedStatus { status, .. } => assert_eq!(status, 503),
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn site_headers_and_user_agent_override_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-requested-with", "XMLHttpRequest"))
        .and(header("user-agent", "prensa-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let mut site = test_site();
    site.user_agent = Some("prensa-test/0.1".to_string());
    site.headers.insert(
        "X-Requested-With".to_string(),
        "XMLHttpRequest".to_string(),
    );

    let body = test_client().fetch_text(&server.uri(), &site).await.unwrap();
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn fetch_bytes_returns_raw_bytes() {
    let server = MockServer::start().await;
    let payload: Vec<u8> = vec![0x1f, 0x8b, 0x08, 0x00];
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .mount(&server)
        .await;

    let bytes = test_client()
        .fetch_bytes(&server.uri(), &test_site())
        .await
        .unwrap();
    assert_eq!(bytes, payload);
}
