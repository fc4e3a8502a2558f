mod common;

use std::time::Duration;

use common::RecordingSink;
use headline_core::FeedSource;
use headline_engine::{FailureKind, FetchSettings, Fetcher, PipelineEvent, ReqwestFetcher};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source(server: &MockServer, route: &str) -> FeedSource {
    FeedSource::new("mock", format!("{}{route}", server.uri()))
}

#[tokio::test]
async fn fetcher_returns_payload_with_declared_charset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<rss><channel></channel></rss>",
            "application/rss+xml; charset=windows-1250",
        ))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let sink = RecordingSink::new();
    let source = source(&server, "/rss");

    let payload = fetcher.fetch(&source, &sink).await.expect("fetch ok");
    assert_eq!(payload.bytes(), b"<rss><channel></channel></rss>");
    assert_eq!(payload.declared_encoding(), Some("windows-1250"));
    assert_eq!(payload.metadata().original_url, source.url);
    assert_eq!(payload.metadata().redirect_count, 0);

    let downloading = sink
        .take()
        .into_iter()
        .any(|event| matches!(event, PipelineEvent::Downloading { .. }));
    assert!(downloading);
}

#[tokio::test]
async fn fetcher_sends_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", "headline-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<rss/>", "text/xml"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        user_agent: "headline-test/1.0".to_string(),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings);
    let payload = fetcher
        .fetch(&source(&server, "/ua"), &RecordingSink::new())
        .await
        .expect("user agent matched");
    assert_eq!(payload.bytes(), b"<rss/>");
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let err = fetcher
        .fetch(&source(&server, "/missing"), &RecordingSink::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw("<rss/>", "text/xml"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings);
    let err = fetcher
        .fetch(&source(&server, "/slow"), &RecordingSink::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_accepts_any_content_type_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<rss><channel></channel></rss>", "application/x-rss+xml"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let payload = fetcher
        .fetch(&source(&server, "/rss"), &RecordingSink::new())
        .await
        .expect("fetch ok");
    assert_eq!(payload.bytes(), b"<rss><channel></channel></rss>");
}

#[tokio::test]
async fn fetcher_rejects_content_type_outside_configured_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 4], "image/png"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        allowed_content_types: vec!["application/rss+xml".to_string(), "text/xml".to_string()],
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings);
    let err = fetcher
        .fetch(&source(&server, "/image"), &RecordingSink::new())
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "image/png".to_string()
        }
    );
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("01234567890", "text/xml"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings);
    let err = fetcher
        .fetch(&source(&server, "/large"), &RecordingSink::new())
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn invalid_url_is_reported_without_network() {
    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let err = fetcher
        .fetch(&FeedSource::new("bad", "not a url"), &RecordingSink::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
