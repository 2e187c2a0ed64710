mod common;

use common::test_http_config;
use common::wiremock_helpers::{mock_error_server, mock_html_page, mount_html, mount_redirect};
use statementfinder::fetcher::{FetchError, Fetcher};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_redirect_chain_is_followed_manually() {
    let server = MockServer::start().await;
    mount_redirect(&server, "/a", 302, "/b").await;
    mount_redirect(&server, "/b", 302, "/c").await;
    mount_html(&server, "/c", "<html><body>final page</body></html>").await;

    let fetcher = Fetcher::new(&test_http_config()).unwrap();
    let page = fetcher.fetch(&format!("{}/a", server.uri())).await.unwrap();

    assert_eq!(page.status.as_u16(), 200);
    assert!(page.body.contains("final page"));
    assert!(page.url.as_str().ends_with("/c"));

    // [302 -> 302 -> 200] means exactly three requests
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_all_three_manual_redirect_statuses_are_followed() {
    for status in [301u16, 302, 303] {
        let server = MockServer::start().await;
        mount_redirect(&server, "/start", status, "/end").await;
        mount_html(&server, "/end", "<p>arrived</p>").await;

        let fetcher = Fetcher::new(&test_http_config()).unwrap();
        let page = fetcher
            .fetch(&format!("{}/start", server.uri()))
            .await
            .unwrap();
        assert!(page.body.contains("arrived"), "status {} not followed", status);
    }
}

#[tokio::test]
async fn test_absolute_location_header_is_followed() {
    let target = MockServer::start().await;
    mount_html(&target, "/landed", "<p>other host</p>").await;

    let server = MockServer::start().await;
    mount_redirect(&server, "/start", 301, &format!("{}/landed", target.uri())).await;

    let fetcher = Fetcher::new(&test_http_config()).unwrap();
    let page = fetcher
        .fetch(&format!("{}/start", server.uri()))
        .await
        .unwrap();

    assert!(page.body.contains("other host"));
    assert_eq!(target.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_redirect_cycle_hits_hop_limit() {
    let server = MockServer::start().await;
    mount_redirect(&server, "/loop", 302, "/loop").await;

    let mut config = test_http_config();
    config.max_redirect_hops = 3;
    let fetcher = Fetcher::new(&config).unwrap();

    let err = fetcher
        .fetch(&format!("{}/loop", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::TooManyRedirects { hops: 4, .. }));

    // hop limit of 3 means the loop gave up after the fourth redirect response
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_non_success_terminal_status_is_an_error() {
    let server = mock_error_server(404).await;

    let fetcher = Fetcher::new(&test_http_config()).unwrap();
    let err = fetcher.fetch(&server.uri()).await.unwrap_err();

    match err {
        FetchError::ResponseCode { status, url } => {
            assert_eq!(status.as_u16(), 404);
            assert!(url.starts_with(&server.uri()));
        }
        other => panic!("expected ResponseCode, got {:?}", other),
    }
}

#[tokio::test]
async fn test_307_is_not_chased() {
    // The audit only follows 301/302/303; other 3xx statuses terminate the
    // loop and surface as response-code errors.
    let server = MockServer::start().await;
    mount_redirect(&server, "/start", 307, "/end").await;
    mount_html(&server, "/end", "<p>never reached</p>").await;

    let fetcher = Fetcher::new(&test_http_config()).unwrap();
    let err = fetcher
        .fetch(&format!("{}/start", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::ResponseCode { status, .. } if status.as_u16() == 307));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_redirect_without_location_is_typed_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bare"))
        .respond_with(ResponseTemplate::new(302))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&test_http_config()).unwrap();
    let err = fetcher
        .fetch(&format!("{}/bare", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::MissingLocation { .. }));
}

#[tokio::test]
async fn test_identifying_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header(
            "user-agent",
            "statementfinder test, Audit: audit@test.example",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&test_http_config()).unwrap();
    fetcher.fetch(&format!("{}/ua", server.uri())).await.unwrap();
}

#[tokio::test]
async fn test_invalid_url_is_recoverable_not_fatal() {
    let fetcher = Fetcher::new(&test_http_config()).unwrap();
    let err = fetcher.fetch("not a url").await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl { .. }));
}

#[tokio::test]
async fn test_success_page_carries_body_and_final_url() {
    let server = mock_html_page("/page", "<html><title>t</title></html>").await;

    let fetcher = Fetcher::new(&test_http_config()).unwrap();
    let page = fetcher.fetch(&format!("{}/page", server.uri())).await.unwrap();

    assert_eq!(page.status.as_u16(), 200);
    assert!(page.body.contains("<title>t</title>"));
}
