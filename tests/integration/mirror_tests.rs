//! Integration tests for the mirror crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch -> persist -> extract cycle against a temporary output directory.

use site_mirror::config::{Config, TraversalOrder};
use site_mirror::crawler::{mirror, FetchError, Fetcher, HttpFetcher, TraversalController};
use site_mirror::state::UrlState;
use site_mirror::storage::FsPersister;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    asset(body, "text/html; charset=utf-8")
}

/// `set_body_string` forces `text/plain`, so typed bodies go through `set_body_raw`
fn asset(body: &str, content_type: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), content_type)
}

fn create_test_config(seed: String, output: &TempDir) -> Config {
    let mut config = Config::from_seed(seed, output.path().to_string_lossy());
    config.fetch.user_agent = "MirrorTestBot/1.0".to_string();
    config.fetch.timeout_ms = 5_000;
    config
}

#[tokio::test]
async fn test_full_mirror_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/html/help/news.html"))
        .respond_with(html(&format!(
            r##"<html><head>
                <link rel="stylesheet" href="../css/help.css">
                <script src="/js/nav.js"></script>
            </head><body>
                <a href="#top">Top</a>
                <a href="topics/intro.html">Intro</a>
                <a href="https://elsewhere.example/page">Elsewhere</a>
                <img src="{}/img/logo.png">
            </body></html>"##,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/html/help/topics/intro.html"))
        .respond_with(html(r#"<a href="../news.html">Back</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/html/css/help.css"))
        .respond_with(asset("body { margin: 0 }", "text/css"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/js/nav.js"))
        .respond_with(asset("console.log('nav');", "application/javascript"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let logo = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];
    Mock::given(method("GET"))
        .and(path("/img/logo.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(logo.clone())
                .insert_header("content-type", "image/png"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/html/help/news.html", base_url), &output);
    let report = mirror(config).await.expect("Mirror failed");

    assert_eq!(report.count(UrlState::Saved), 5);
    assert!(report.is_clean());
    assert_eq!(report.filtered_offsite, 1);

    let root = output.path();
    assert!(root.join("html/help/news.html").is_file());
    assert!(root.join("html/help/topics/intro.html").is_file());
    assert_eq!(
        std::fs::read_to_string(root.join("html/css/help.css")).unwrap(),
        "body { margin: 0 }"
    );
    assert_eq!(
        std::fs::read_to_string(root.join("js/nav.js")).unwrap(),
        "console.log('nav');"
    );
    assert_eq!(std::fs::read(root.join("img/logo.png")).unwrap(), logo);
}

#[tokio::test]
async fn test_cyclic_links_fetch_each_page_once() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/a.html"))
        .respond_with(html(r#"<a href="b.html">B</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b.html"))
        .respond_with(html(r#"<a href="a.html">A</a><a href="b.html">self</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(format!("{}/a.html", mock_server.uri()), &output);
    config.crawl.skip_existing = false;
    let report = mirror(config).await.expect("Mirror failed");

    assert_eq!(report.fetch_attempts(), 2);
}

#[tokio::test]
async fn test_failed_fetch_is_isolated() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/broken.html">B</a><a href="/gone.html">G</a><a href="/fine.html">F</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone.html"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/fine.html"))
        .respond_with(html("<p>fine</p>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/", mock_server.uri()), &output);
    let report = mirror(config).await.expect("Mirror failed");

    assert_eq!(report.count(UrlState::FailedFetch), 2);
    assert_eq!(report.count(UrlState::Saved), 2);
    assert!(output.path().join("index.html").is_file());
    assert!(output.path().join("fine.html").is_file());
    assert!(!output.path().join("broken.html").exists());
    assert!(!output.path().join("gone.html").exists());
    assert!(report
        .fetch_failures
        .iter()
        .any(|f| f.reason == "HTTP 404"));
}

#[tokio::test]
async fn test_existing_files_are_not_refetched() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    std::fs::create_dir_all(output.path().join("assets")).unwrap();
    std::fs::write(output.path().join("assets/app.js"), "cached").unwrap();

    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(html(r#"<script src="assets/app.js"></script>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/assets/app.js"))
        .respond_with(asset("fresh", "application/javascript"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/index.html", mock_server.uri()), &output);
    let report = mirror(config).await.expect("Mirror failed");

    assert_eq!(report.skipped_existing, 1);
    assert_eq!(
        std::fs::read_to_string(output.path().join("assets/app.js")).unwrap(),
        "cached"
    );
}

#[tokio::test]
async fn test_breadth_first_mirror_via_controller() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/docs/"))
        .respond_with(html(r#"<a href="one.html">1</a><a href="two.html">2</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    for page in ["/docs/one.html", "/docs/two.html"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html(r#"<a href="/docs/">up</a>"#))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let mut config = create_test_config(format!("{}/docs/", mock_server.uri()), &output);
    config.crawl.order = TraversalOrder::BreadthFirst;

    let fetcher = HttpFetcher::from_config(&config.fetch).unwrap();
    let persister = FsPersister::new(output.path());
    let seed = url::Url::parse(&config.mirror.seed_url).unwrap();
    let report = TraversalController::new(seed, config.crawl, fetcher, persister)
        .unwrap()
        .run()
        .await;

    assert_eq!(report.count(UrlState::Saved), 3);
    assert!(output.path().join("docs/index.html").is_file());
    assert!(output.path().join("docs/one.html").is_file());
    assert!(output.path().join("docs/two.html").is_file());
}

#[tokio::test]
async fn test_fetcher_follows_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/new/", mock_server.uri()).as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new/"))
        .respond_with(html("<p>moved</p>"))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::from_config(&Default::default()).unwrap();
    let url = url::Url::parse(&format!("{}/old", mock_server.uri())).unwrap();
    let resource = fetcher.fetch(&url).await.unwrap();

    assert_eq!(resource.url, url);
    assert_eq!(resource.final_url.path(), "/new/");
    assert_eq!(resource.text.as_deref(), Some("<p>moved</p>"));
}

#[tokio::test]
async fn test_directory_redirect_mirrors_subtree() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/docs/"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/"))
        .respond_with(html(r#"<a href="one.html">1</a><a href="/docs/">self</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/one.html"))
        .respond_with(asset("<p>one</p>", "text/plain"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/docs", mock_server.uri()), &output);
    let report = mirror(config).await.expect("Mirror failed");

    assert!(report.is_clean());
    assert_eq!(report.count(UrlState::Saved), 2);
    assert!(output.path().join("docs/index.html").is_file());
    assert_eq!(
        std::fs::read_to_string(output.path().join("docs/one.html")).unwrap(),
        "<p>one</p>"
    );
}

#[tokio::test]
async fn test_fetcher_retries_server_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(html("<p>ok</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = site_mirror::crawler::build_http_client(&Default::default()).unwrap();
    let fetcher = HttpFetcher::new(client, 2, Duration::from_millis(10));
    let url = url::Url::parse(&format!("{}/flaky", mock_server.uri())).unwrap();

    let resource = fetcher.fetch(&url).await.unwrap();
    assert_eq!(resource.status, 200);
}

#[tokio::test]
async fn test_fetcher_without_retries_fails_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::from_config(&Default::default()).unwrap();
    let url = url::Url::parse(&format!("{}/down", mock_server.uri())).unwrap();

    let result = fetcher.fetch(&url).await;
    assert_eq!(result.unwrap_err(), FetchError::Status { status: 503 });
}

#[tokio::test]
async fn test_fetcher_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<p>late</p>").set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let mut fetch_config = site_mirror::config::FetchConfig::default();
    fetch_config.timeout_ms = 50;
    let fetcher = HttpFetcher::from_config(&fetch_config).unwrap();
    let url = url::Url::parse(&format!("{}/slow", mock_server.uri())).unwrap();

    assert_eq!(fetcher.fetch(&url).await.unwrap_err(), FetchError::Timeout);
}
