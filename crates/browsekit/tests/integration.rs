//! Integration tests for BrowseKit using wiremock

use browsekit::{
    fetch, fetch_with_options, render_to_string, Agent, ErrorKind, FetchError, FetchOptions,
    HeaderPolicy, HttpVersion, Locator, DEFAULT_USER_AGENT,
};
use wiremock::matchers::{method, path};
use tracing_subscriber::EnvFilter;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Route library logs through the test harness; `RUST_LOG=browsekit=debug`
/// shows them for failing tests
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn locator(server: &MockServer, path: &str) -> Locator {
    init_tracing();
    Locator::parse(&format!("{}{}", server.uri(), path)).unwrap()
}

#[tokio::test]
async fn test_simple_get() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("Hello, World!")
                .insert_header("content-type", "text/plain"),
        )
        .mount(&mock_server)
        .await;

    let page = fetch(&locator(&mock_server, "/")).await.unwrap();

    assert_eq!(page.status_code, Some(200));
    assert_eq!(page.reason.as_deref(), Some("OK"));
    assert_eq!(page.content_type, Some("text/plain".to_string()));
    assert_eq!(page.charset.as_deref(), Some("UTF-8"));
    assert_eq!(page.content, "Hello, World!");
    assert_eq!(page.size, 13);
}

#[tokio::test]
async fn test_http11_request_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    fetch(&locator(&mock_server, "/page?q=1")).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let request = &requests[0];
    assert_eq!(request.url.query(), Some("q=1"));
    assert_eq!(
        request.headers.get("user-agent").unwrap().to_str().unwrap(),
        DEFAULT_USER_AGENT
    );
    assert_eq!(
        request.headers.get("host").unwrap().to_str().unwrap(),
        format!("127.0.0.1:{}", mock_server.address().port())
    );
}

#[tokio::test]
async fn test_http10_request_sends_host_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("old school"))
        .mount(&mock_server)
        .await;

    let options = FetchOptions {
        http_version: HttpVersion::Http10,
        ..Default::default()
    };
    let page = fetch_with_options(&locator(&mock_server, "/"), &options)
        .await
        .unwrap();
    assert_eq!(page.content, "old school");

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("user-agent").is_none());
    assert!(requests[0].headers.get("host").is_some());
}

#[tokio::test]
async fn test_custom_user_agent() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let agent = Agent::builder().user_agent("TestAgent/2.0").build();
    agent
        .load(Some(&format!("{}/", mock_server.uri())))
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].headers.get("user-agent").unwrap().to_str().unwrap(),
        "TestAgent/2.0"
    );
}

#[tokio::test]
async fn test_html_to_text() {
    init_tracing();
    let mock_server = MockServer::start().await;

    let html = r#"<!DOCTYPE html>
<html>
<head><title>Test</title></head>
<body><h1>Hello World</h1><p>This is a <strong>test</strong> &lt;paragraph&gt;.</p></body>
</html>"#;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .mount(&mock_server)
        .await;

    let agent = Agent::default();
    let mut out = Vec::new();
    let page = agent
        .browse(Some(&format!("{}/", mock_server.uri())), &mut out)
        .await
        .unwrap();

    assert_eq!(page.content, html);
    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        "\n\nTest\nHello WorldThis is a test <paragraph>.\n"
    );
}

#[tokio::test]
async fn test_view_source_over_http() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>a &lt; b</p>", "text/html"))
        .mount(&mock_server)
        .await;

    let raw = format!("view-source:{}/", mock_server.uri());
    let page = Agent::default().load(Some(&raw)).await.unwrap();

    assert!(page.view_source);
    assert_eq!(render_to_string(&page.content, page.view_source), "<p>a &lt; b</p>");
}

#[tokio::test]
async fn test_declared_charset() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<p>caf\xe9</p>".to_vec(), "text/html; charset=ISO-8859-1"),
        )
        .mount(&mock_server)
        .await;

    let page = fetch(&locator(&mock_server, "/latin1")).await.unwrap();

    assert_eq!(page.content, "<p>café</p>");
    assert_eq!(page.charset.as_deref(), Some("windows-1252"));
}

#[tokio::test]
async fn test_invalid_body_for_charset() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"caf\xe9".to_vec(), "text/html"))
        .mount(&mock_server)
        .await;

    let err = fetch(&locator(&mock_server, "/")).await.unwrap_err();
    assert!(matches!(err, FetchError::Encoding { charset: "UTF-8" }));
    assert_eq!(err.kind(), ErrorKind::Encoding);
}

#[tokio::test]
async fn test_content_encoding_rejected_by_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("not really gzip")
                .insert_header("content-encoding", "gzip"),
        )
        .mount(&mock_server)
        .await;

    let err = fetch(&locator(&mock_server, "/")).await.unwrap_err();
    assert!(matches!(err, FetchError::ProtocolViolation(_)));
    assert_eq!(err.kind(), ErrorKind::ProtocolViolation);
}

#[tokio::test]
async fn test_content_encoding_ignored_when_lenient() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("not really gzip")
                .insert_header("content-encoding", "gzip"),
        )
        .mount(&mock_server)
        .await;

    let options = FetchOptions {
        header_policy: HeaderPolicy::Lenient,
        ..Default::default()
    };
    let page = fetch_with_options(&locator(&mock_server, "/"), &options)
        .await
        .unwrap();
    assert_eq!(page.content, "not really gzip");
}

#[tokio::test]
async fn test_4xx_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/not-found"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string("Not Found")
                .insert_header("content-type", "text/plain"),
        )
        .mount(&mock_server)
        .await;

    let page = fetch(&locator(&mock_server, "/not-found")).await.unwrap();

    // Error statuses still produce a page
    assert_eq!(page.status_code, Some(404));
    assert_eq!(page.reason.as_deref(), Some("Not Found"));
    assert_eq!(page.content, "Not Found");
}

#[tokio::test]
async fn test_5xx_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let page = fetch(&locator(&mock_server, "/error")).await.unwrap();

    assert_eq!(page.status_code, Some(500));
    assert!(page.content.contains("Internal Server Error"));
}

#[tokio::test]
async fn test_local_file_matches_disk() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let contents = "<html><body>Local &amp; <em>plain</em>\r\nline two</body></html>\n";
    std::fs::write(dir.path().join("index.html"), contents).unwrap();

    let agent = Agent::builder().file_root(dir.path()).build();
    let page = agent.load(Some("file:///index.html")).await.unwrap();

    assert_eq!(page.content.as_bytes(), std::fs::read(dir.path().join("index.html")).unwrap());
    assert_eq!(
        agent.render_to_string(&page),
        "Local & plain\r\nline two\n"
    );
}

#[tokio::test]
async fn test_local_file_missing() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let agent = Agent::builder().file_root(dir.path()).build();

    let err = agent.load(Some("file:///missing.html")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[tokio::test]
async fn test_data_locator() {
    init_tracing();
    let page = fetch(&Locator::parse("data:text/html,hello").unwrap())
        .await
        .unwrap();
    assert!(page.content.contains("<body>hello</body>"));
    assert_eq!(render_to_string(&page.content, false), "hello");
}

#[tokio::test]
async fn test_default_locator() {
    init_tracing();
    let agent = Agent::builder()
        .default_locator("data:text/html,<p>start page</p>")
        .build();
    let mut out = Vec::new();
    agent.browse(None, &mut out).await.unwrap();
    assert_eq!(out, b"start page");
}

#[tokio::test]
async fn test_parse_failures_surface() {
    init_tracing();
    let agent = Agent::default();

    let err = agent.load(Some("example.org/index.html")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);

    let err = agent.load(Some("gopher://example.org/")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedScheme);

    let err = agent.load(Some("data:text/plain,hi")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedScheme);
}
