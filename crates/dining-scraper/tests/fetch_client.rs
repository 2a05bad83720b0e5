//! Integration tests for `FetchClient::fetch_text`.
//!
//! Each test stands up a `wiremock` server so no real network traffic is
//! made. Covers redirect following up to and past the hop bound, per-hop
//! timeouts, and each error variant.

use std::time::Duration;

use wiremock::matchers::{header, headers, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dining_scraper::{FetchClient, FetchError};

fn test_client() -> FetchClient {
    FetchClient::new(Duration::from_secs(5), "dining-test/0.1", 3)
        .expect("failed to build test FetchClient")
}

fn redirect(status: u16, location: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).insert_header("Location", location)
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_text_returns_body_on_success() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/hall/",
        ResponseTemplate::new(200).set_body_string("<html>ok</html>"),
    )
    .await;

    let body = test_client()
        .fetch_text(&format!("{}/hall/", server.uri()))
        .await
        .expect("fetch succeeds");
    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn fetch_text_sends_user_agent_and_accept_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hall/"))
        .and(header("user-agent", "dining-test/0.1"))
        .and(headers("accept", vec!["text/html", "application/xhtml+xml"]))
        .respond_with(ResponseTemplate::new(200).set_body_string("matched"))
        .expect(1)
        .mount(&server)
        .await;

    let body = test_client()
        .fetch_text(&format!("{}/hall/", server.uri()))
        .await
        .expect("fetch succeeds");
    assert_eq!(body, "matched");
}

#[tokio::test]
async fn fetch_text_follows_three_redirect_hops() {
    let server = MockServer::start().await;
    mount(&server, "/r0", redirect(301, "/r1")).await;
    mount(&server, "/r1", redirect(302, &format!("{}/r2", server.uri()))).await;
    mount(&server, "/r2", redirect(307, "r3")).await;
    mount(
        &server,
        "/r3",
        ResponseTemplate::new(200).set_body_string("final"),
    )
    .await;

    let body = test_client()
        .fetch_text(&format!("{}/r0", server.uri()))
        .await
        .expect("fetch succeeds");
    assert_eq!(body, "final");
}

#[tokio::test]
async fn fetch_text_stops_at_redirect_bound_and_accepts_last_response() {
    let server = MockServer::start().await;
    mount(&server, "/r0", redirect(302, "/r1")).await;
    mount(&server, "/r1", redirect(302, "/r2")).await;
    mount(&server, "/r2", redirect(302, "/r3")).await;
    mount(
        &server,
        "/r3",
        redirect(308, "/r4").set_body_string("stuck on hop three"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/r4"))
        .respond_with(ResponseTemplate::new(200).set_body_string("unreachable"))
        .expect(0)
        .mount(&server)
        .await;

    let body = test_client()
        .fetch_text(&format!("{}/r0", server.uri()))
        .await
        .expect("redirect at the bound is accepted as-is");
    assert_eq!(body, "stuck on hop three");
}

#[tokio::test]
async fn fetch_text_accepts_redirect_without_location() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/moved",
        ResponseTemplate::new(302).set_body_string("no location"),
    )
    .await;

    let body = test_client()
        .fetch_text(&format!("{}/moved", server.uri()))
        .await
        .expect("redirect without Location is terminal");
    assert_eq!(body, "no location");
}

#[tokio::test]
async fn fetch_text_does_not_follow_see_other() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/form",
        redirect(303, "/elsewhere").set_body_string("see other"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let body = test_client()
        .fetch_text(&format!("{}/form", server.uri()))
        .await
        .expect("303 is terminal");
    assert_eq!(body, "see other");
}

#[tokio::test]
async fn fetch_text_maps_error_status_to_http_error() {
    let server = MockServer::start().await;
    mount(&server, "/missing", ResponseTemplate::new(404)).await;

    let err = test_client()
        .fetch_text(&format!("{}/missing", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, FetchError::Http { status: 404, .. }),
        "expected Http(404), got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_text_reports_error_status_after_redirects() {
    let server = MockServer::start().await;
    mount(&server, "/old", redirect(301, "/gone")).await;
    mount(&server, "/gone", ResponseTemplate::new(503)).await;

    let err = test_client()
        .fetch_text(&format!("{}/old", server.uri()))
        .await
        .unwrap_err();
    match err {
        FetchError::Http { status, url } => {
            assert_eq!(status, 503);
            assert!(url.ends_with("/gone"), "url should be the final hop: {url}");
        }
        other => panic!("expected Http, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_text_times_out_slow_response() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/slow",
        ResponseTemplate::new(200)
            .set_body_string("late")
            .set_delay(Duration::from_secs(2)),
    )
    .await;

    let client = FetchClient::new(Duration::from_millis(200), "dining-test/0.1", 3)
        .expect("client builds");
    let err = client
        .fetch_text(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, FetchError::Timeout { .. }),
        "expected Timeout, got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_text_rearms_timeout_on_each_hop() {
    let server = MockServer::start().await;
    let hop_delay = Duration::from_millis(250);
    mount(&server, "/h0", redirect(302, "/h1").set_delay(hop_delay)).await;
    mount(&server, "/h1", redirect(302, "/h2").set_delay(hop_delay)).await;
    mount(
        &server,
        "/h2",
        ResponseTemplate::new(200)
            .set_body_string("made it")
            .set_delay(hop_delay),
    )
    .await;

    // The chain takes ~750ms in total, more than one budget, but no single
    // hop exceeds it.
    let client = FetchClient::new(Duration::from_millis(600), "dining-test/0.1", 3)
        .expect("client builds");
    let body = client
        .fetch_text(&format!("{}/h0", server.uri()))
        .await
        .expect("each hop fits its own budget");
    assert_eq!(body, "made it");
}

#[tokio::test]
async fn fetch_text_maps_refused_connection_to_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let err = test_client()
        .fetch_text(&format!("http://{addr}/"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, FetchError::Network { .. }),
        "expected Network, got: {err:?}"
    );
}
