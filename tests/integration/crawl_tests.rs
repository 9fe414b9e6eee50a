//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over real HTTP.

use datacrawl::config::{parse_config, CrawlConfig};
use datacrawl::{CrawlError, Crawler, CrawlResult};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration that crawls quickly
fn create_test_config(root_url: &str) -> CrawlConfig {
    let mut config = CrawlConfig::new(root_url);
    config.max_links = 10;
    config.max_workers = 2;
    config.delay = 0.0;
    config.retry_backoff = 0.01;
    config.request_timeout = 5.0;
    config.user_agent = "testbot/1.0".to_string();
    config
}

/// Mounts an HTML page at `route` linking to each of `links`
async fn mount_page(server: &MockServer, route: &str, links: &[&str]) {
    let anchors: String = links
        .iter()
        .map(|link| format!(r#"<a href="{}">{}</a>"#, link, link))
        .collect();
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(
                    "<html><head><title>{}</title></head><body>{}</body></html>",
                    route, anchors
                ))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, content: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(content))
        .expect(1)
        .mount(server)
        .await;
}

async fn run(config: CrawlConfig) -> CrawlResult {
    Crawler::new(config)
        .expect("Failed to create crawler")
        .run()
        .await
        .expect("Crawl failed")
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", &["/page1", "/page2?ref=home", "#top"]).await;
    mount_page(&mock_server, "/page1", &["/page2", "/page1"]).await;
    mount_page(&mock_server, "/page2", &["page3"]).await;
    mount_page(&mock_server, "/page2/page3", &[]).await;

    let results = run(create_test_config(&base_url)).await;

    let keys: Vec<String> = results.keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            base_url.clone(),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
            format!("{}/page2/page3", base_url),
        ]
    );

    assert_eq!(
        results[&base_url].urls,
        vec![
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
            base_url.clone(),
        ]
    );
    assert_eq!(
        results[&format!("{}/page1", base_url)].urls,
        vec![format!("{}/page2", base_url), format!("{}/page1", base_url)]
    );
    assert!(results[&base_url].body.is_none());
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /admin").await;
    mount_page(&mock_server, "/", &["/public", "/admin", "/admin/users"]).await;
    mount_page(&mock_server, "/public", &[]).await;

    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0) // Should never be called
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(create_test_config(&base_url)).expect("Failed to create crawler");
    let results = crawler.run().await.expect("Crawl failed");

    assert_eq!(results.len(), 2);
    assert!(results.contains_key(&format!("{}/public", base_url)));
    assert!(!results.contains_key(&format!("{}/admin", base_url)));
    assert_eq!(crawler.stats().robots_denied, 2);
    assert_eq!(crawler.robots_cache_len(), 1);
}

#[tokio::test]
async fn test_robots_txt_ignored_when_disabled() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", &[]).await;

    let mut config = create_test_config(&base_url);
    config.respect_robots_txt = false;
    let results = run(config).await;

    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_transient_errors_retried() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url);
    config.max_retry_attempts = 2;
    config.respect_robots_txt = false;

    let crawler = Crawler::new(config).expect("Failed to create crawler");
    let results = crawler.run().await.expect("Crawl failed");

    assert!(results.is_empty());
    assert_eq!(crawler.stats().fetch_failures, 1);
}

#[tokio::test]
async fn test_recovers_after_transient_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", &[]).await;

    let mut config = create_test_config(&base_url);
    config.respect_robots_txt = false;
    let results = run(config).await;

    assert!(results.contains_key(&base_url));
}

#[tokio::test]
async fn test_permanent_error_not_retried() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", &["/gone"]).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url);
    config.respect_robots_txt = false;
    let results = run(config).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[&base_url].urls, vec![format!("{}/gone", base_url)]);
}

#[tokio::test]
async fn test_dead_link_fetched_once_per_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", &["/dead", "/a", "/b"]).await;
    mount_page(&mock_server, "/a", &["/dead"]).await;
    mount_page(&mock_server, "/b", &["/dead"]).await;
    Mock::given(method("GET"))
        .and(path("/dead"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3) // one attempt plus two retries, never repeated
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url);
    config.respect_robots_txt = false;
    config.max_retry_attempts = 2;

    let crawler = Crawler::new(config).expect("Failed to create crawler");
    let results = crawler.run().await.expect("Crawl failed");

    assert_eq!(results.len(), 3);
    assert_eq!(crawler.stats().fetch_failures, 1);
}

#[tokio::test]
async fn test_timeout_not_retried() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url);
    config.respect_robots_txt = false;
    config.request_timeout = 0.2;

    let crawler = Crawler::new(config).expect("Failed to create crawler");
    let results = crawler.run().await.expect("Crawl failed");

    assert!(results.is_empty());
    assert_eq!(crawler.stats().fetch_failures, 1);
}

#[tokio::test]
async fn test_internal_links_only() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let other_url = other_server.uri();

    let external = format!("{}/elsewhere", other_url);
    mount_page(&mock_server, "/", &["/inside", &external]).await;
    mount_page(&mock_server, "/inside", &[]).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&other_server)
        .await;

    let mut config = create_test_config(&base_url);
    config.respect_robots_txt = false;
    config.internal_links_only = true;
    let results = run(config).await;

    assert_eq!(results[&base_url].urls, vec![format!("{}/inside", base_url)]);
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_url_regex_filter() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", &["/posts/1", "/posts/2", "/about"]).await;
    mount_page(&mock_server, "/posts/1", &[]).await;
    mount_page(&mock_server, "/posts/2", &[]).await;

    let mut config = create_test_config(&base_url);
    config.respect_robots_txt = false;
    config.url_regex = Some(r".*/posts/[0-9]+".to_string());
    let results = run(config).await;

    assert_eq!(results.len(), 3);
    assert!(!results.contains_key(&format!("{}/about", base_url)));
}

#[tokio::test]
async fn test_page_budget() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let body = r#"<a href="/a">a</a><a href="/b">b</a><a href="/c">c</a><a href="/d">d</a>"#;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url);
    config.respect_robots_txt = false;
    config.max_links = 3;
    let results = run(config).await;

    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn test_user_agent_sent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "testbot/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>ok</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&base_url);
    config.respect_robots_txt = false;
    config.include_body = true;
    let results = run(config).await;

    assert_eq!(results[&base_url].body.as_deref(), Some("<p>ok</p>"));
}

#[tokio::test]
async fn test_crawl_delay_honoured() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nCrawl-delay: 0.3").await;
    mount_page(&mock_server, "/", &["/next"]).await;
    mount_page(&mock_server, "/next", &[]).await;

    let mut config = create_test_config(&base_url);
    config.max_workers = 1;

    let started = Instant::now();
    let results = run(config).await;

    assert_eq!(results.len(), 2);
    assert!(started.elapsed() >= Duration::from_millis(600));
}

#[tokio::test]
async fn test_results_saved_to_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", &["/child"]).await;
    mount_page(&mock_server, "/child", &[]).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let output = dir.path().join("results.json");

    let mut config = create_test_config(&base_url);
    config.respect_robots_txt = false;
    config.save_to_file = Some(output.clone());
    let results = run(config).await;

    let content = std::fs::read_to_string(&output).expect("Failed to read results file");
    let saved: CrawlResult = serde_json::from_str(&content).expect("Invalid JSON");
    assert_eq!(saved, results);
    assert!(content.contains("\n    \""));
}

#[tokio::test]
async fn test_config_from_toml() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", &[]).await;

    let config = parse_config(&format!(
        r#"
root_url = "{}"
max_links = 1
delay = 0.0
respect_robots_txt = false
user_agent = "testbot/1.0"
"#,
        base_url
    ))
    .expect("Failed to parse config");

    let results = run(config).await;
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_conflicting_scope_makes_no_requests() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.internal_links_only = true;
    config.external_links_only = true;

    assert!(matches!(Crawler::new(config), Err(CrawlError::Config(_))));
}
