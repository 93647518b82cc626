//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! full crawl cycle end-to-end: frontier traversal, robots compliance,
//! rate limiting, failure isolation, and fact extraction.

use profilebot::config::{CrawlTarget, CrawlerConfig};
use profilebot::crawler::crawl;
use profilebot::report::SkipReason;
use std::collections::HashSet;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates crawler settings suited to fast tests
fn test_config(max_pages: usize) -> CrawlerConfig {
    CrawlerConfig {
        max_pages,
        timeout_secs: 1,
        delay_secs: 0.0,
        respect_robots: true,
        user_agent: "TestBot/1.0".to_string(),
        ..Default::default()
    }
}

async fn mount_robots(server: &MockServer, content: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(content.to_string()))
        .mount(server)
        .await;
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_extracts_facts() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nAllow: /").await;

    mount_html(
        &server,
        "/",
        format!(
            r#"<html><head><title>Acme</title>
            <meta name="description" content="We make products"></head>
            <body>Our product and service lineup.
            <a href="{base}/about">About</a>
            <a href="{base}/contact">Contact</a>
            </body></html>"#
        ),
    )
    .await;

    mount_html(
        &server,
        "/about",
        r#"<html><head><title>About</title></head>
        <body>Our mission is innovation.</body></html>"#
            .to_string(),
    )
    .await;

    mount_html(
        &server,
        "/contact",
        r#"<html><head><title>Contact</title></head>
        <body><p>Contact: jane@acme.com, (555) 123-4567</p>
        <div>500 Howard Street, Suite 300</div></body></html>"#
            .to_string(),
    )
    .await;

    let target = CrawlTarget::from_config(&base, &test_config(10)).unwrap();
    let result = crawl(target).await.unwrap();

    assert_eq!(result.pages.len(), 3);
    assert_eq!(result.stats.attempted, 3);
    assert_eq!(result.stats.succeeded, 3);
    assert_eq!(result.stats.skipped, 0);

    // Unified contact set spans all pages
    assert!(result.contacts.emails.contains("jane@acme.com"));
    assert!(result.contacts.phones.contains("(555) 123-4567"));
    assert_eq!(
        result.contacts.address.as_deref(),
        Some("500 Howard Street, Suite 300")
    );

    // Business terms from the vocabulary were found somewhere on the site
    assert!(result.business_terms.contains("product"));
    assert!(result.business_terms.contains("mission"));

    // Metadata from the seed page
    assert_eq!(result.pages[0].title.as_deref(), Some("Acme"));
    assert_eq!(
        result.pages[0].description.as_deref(),
        Some("We make products")
    );
}

#[tokio::test]
async fn test_no_duplicate_pages_and_same_domain_scope() {
    let server = MockServer::start().await;
    let base = server.uri();
    let domain = url::Url::parse(&base).unwrap().host_str().unwrap().to_string();

    mount_robots(&server, "User-agent: *\nAllow: /").await;

    // Every page links back to the others, with fragment/slash variants
    mount_html(
        &server,
        "/",
        format!(
            r#"<html><body>
            <a href="{base}/a">A</a>
            <a href="{base}/a/">A again</a>
            <a href="{base}/a#top">A anchor</a>
            <a href="https://elsewhere.example/x">External</a>
            </body></html>"#
        ),
    )
    .await;

    mount_html(
        &server,
        "/a",
        format!(r#"<html><body><a href="{base}/">Home</a></body></html>"#),
    )
    .await;

    let target = CrawlTarget::from_config(&base, &test_config(10)).unwrap();
    let result = crawl(target).await.unwrap();

    // Dedup invariant: no two page records share a URL
    let urls: HashSet<_> = result.pages.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(urls.len(), result.pages.len());
    assert_eq!(result.pages.len(), 2);

    // Scope invariant: every crawled page is on the seed's domain
    for page in &result.pages {
        let page_url = url::Url::parse(&page.url).unwrap();
        assert_eq!(page_url.host_str(), Some(domain.as_str()));
    }
}

#[tokio::test]
async fn test_robots_disallowed_path_never_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nDisallow: /private").await;

    mount_html(
        &server,
        "/",
        format!(
            r#"<html><body>
            <a href="{base}/team">Team</a>
            <a href="{base}/private/salaries">Secret</a>
            </body></html>"#
        ),
    )
    .await;

    mount_html(
        &server,
        "/team",
        "<html><body>People</body></html>".to_string(),
    )
    .await;

    // The disallowed page must never receive a request
    Mock::given(method("GET"))
        .and(path("/private/salaries"))
        .respond_with(ResponseTemplate::new(200).set_body_string("nope"))
        .expect(0)
        .mount(&server)
        .await;

    let target = CrawlTarget::from_config(&base, &test_config(10)).unwrap();
    let result = crawl(target).await.unwrap();

    assert_eq!(result.stats.succeeded, 2);
    assert_eq!(result.stats.skipped, 1);
    assert!(result
        .skipped
        .iter()
        .any(|s| s.url.contains("/private") && s.reason == SkipReason::RobotsDisallowed));

    // No page record under /private
    assert!(result.pages.iter().all(|p| !p.url.contains("/private")));
}

#[tokio::test]
async fn test_robots_ignored_when_compliance_disabled() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nDisallow: /").await;
    mount_html(&server, "/", "<html><body>Open door</body></html>".to_string()).await;

    let config = CrawlerConfig {
        respect_robots: false,
        ..test_config(5)
    };
    let target = CrawlTarget::from_config(&base, &config).unwrap();
    let result = crawl(target).await.unwrap();

    assert_eq!(result.stats.succeeded, 1);
}

#[tokio::test]
async fn test_budget_of_one_crawls_only_the_seed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nAllow: /").await;

    mount_html(
        &server,
        "/",
        format!(
            r#"<html><body>
            <a href="{base}/one">1</a>
            <a href="{base}/two">2</a>
            </body></html>"#
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/one"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x"))
        .expect(0)
        .mount(&server)
        .await;

    let target = CrawlTarget::from_config(&base, &test_config(1)).unwrap();
    let result = crawl(target).await.unwrap();

    assert_eq!(result.pages.len(), 1);
    assert_eq!(result.stats.attempted, 1);
    // Discovered links are still recorded on the page itself
    assert_eq!(result.pages[0].links.len(), 2);
}

#[tokio::test]
async fn test_timed_out_page_is_skipped_and_crawl_continues() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nAllow: /").await;

    mount_html(
        &server,
        "/",
        format!(
            r#"<html><body>
            <a href="{base}/slow">Slow</a>
            <a href="{base}/fast">Fast</a>
            </body></html>"#
        ),
    )
    .await;

    // Longer than the 1s request timeout
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .insert_header("content-type", "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    mount_html(
        &server,
        "/fast",
        "<html><body>Quick</body></html>".to_string(),
    )
    .await;

    let target = CrawlTarget::from_config(&base, &test_config(10)).unwrap();
    let result = crawl(target).await.unwrap();

    assert_eq!(result.stats.attempted, 3);
    assert_eq!(result.stats.succeeded, 2);
    assert!(result
        .skipped
        .iter()
        .any(|s| s.url.ends_with("/slow") && s.reason == SkipReason::Timeout));

    // The page after the timeout was still crawled
    assert!(result.pages.iter().any(|p| p.url.ends_with("/fast")));
}

#[tokio::test]
async fn test_non_html_response_is_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nAllow: /").await;

    mount_html(
        &server,
        "/",
        format!(r#"<html><body><a href="{base}/report.pdf">Report</a></body></html>"#),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x25, 0x50, 0x44, 0x46])
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&server)
        .await;

    let target = CrawlTarget::from_config(&base, &test_config(10)).unwrap();
    let result = crawl(target).await.unwrap();

    assert_eq!(result.stats.succeeded, 1);
    assert!(result
        .skipped
        .iter()
        .any(|s| s.url.ends_with("/report.pdf")
            && s.reason == SkipReason::UnsupportedContentType));
}

#[tokio::test]
async fn test_http_error_recorded_with_status() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_robots(&server, "User-agent: *\nAllow: /").await;

    mount_html(
        &server,
        "/",
        format!(r#"<html><body><a href="{base}/gone">Gone</a></body></html>"#),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let target = CrawlTarget::from_config(&base, &test_config(10)).unwrap();
    let result = crawl(target).await.unwrap();

    assert!(result
        .skipped
        .iter()
        .any(|s| s.url.ends_with("/gone") && s.reason == SkipReason::HttpError(404)));
    assert_eq!(
        result.stats.succeeded + result.stats.skipped,
        result.stats.attempted
    );
}

#[tokio::test]
async fn test_missing_robots_txt_fails_open() {
    let server = MockServer::start().await;
    let base = server.uri();

    // No robots.txt mock mounted: the fetch gets a 404
    mount_html(&server, "/", "<html><body>Home</body></html>".to_string()).await;

    let target = CrawlTarget::from_config(&base, &test_config(5)).unwrap();
    let result = crawl(target).await.unwrap();

    assert_eq!(result.stats.succeeded, 1);
}
