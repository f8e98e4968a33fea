use link_preview_generator::{FetchResult, Fetcher, FetcherConfig, PreviewError, ServiceMode};
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn fetcher(server: &MockServer, mode: ServiceMode) -> Fetcher {
    let config = match mode {
        ServiceMode::Metadata => FetcherConfig::metadata(&server.uri()).unwrap(),
        ServiceMode::Screenshot => {
            FetcherConfig::screenshot(&format!("{}/shot", server.uri())).unwrap()
        }
    };
    Fetcher::new_with_config(config.with_timeout(Duration::from_secs(5))).unwrap()
}

#[tokio::test]
async fn test_http_500_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/preview"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({"error": "rate limited"})),
        )
        .mount(&server)
        .await;

    let result = fetcher(&server, ServiceMode::Metadata)
        .fetch("example.com")
        .await;

    match result {
        Err(PreviewError::ServiceError { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message.as_deref(), Some("rate limited"));
        }
        other => panic!("Expected ServiceError, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_http_404_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = fetcher(&server, ServiceMode::Screenshot)
        .fetch("example.com")
        .await;

    assert!(matches!(
        result,
        Err(PreviewError::ServiceError {
            status: 404,
            message: None
        })
    ));
}

#[tokio::test]
async fn test_invalid_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/shot"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"{}".to_vec(), "application/json"),
        )
        .mount(&server)
        .await;

    let result = fetcher(&server, ServiceMode::Screenshot)
        .fetch("example.com")
        .await;

    match result {
        Err(PreviewError::InvalidPayload(content_type)) => {
            assert_eq!(content_type, "application/json");
        }
        other => panic!("Expected InvalidPayload, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_timeout_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let config = FetcherConfig::metadata(&server.uri())
        .unwrap()
        .with_timeout(Duration::from_millis(100));
    let result = Fetcher::new_with_config(config)
        .unwrap()
        .fetch("example.com")
        .await;

    assert!(matches!(result, Err(PreviewError::TransportFailure(_))));
}

#[tokio::test]
async fn test_successful_shapes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/shot"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1u8, 2, 3], "image/webp"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/preview"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"title": "Example", "keywords": ["a"]})),
        )
        .mount(&server)
        .await;

    match fetcher(&server, ServiceMode::Screenshot).fetch("example.com").await {
        Ok(FetchResult::Image(image)) => {
            assert_eq!(image.content_type(), "image/webp");
            assert_eq!(image.bytes(), &[1u8, 2, 3][..]);
        }
        other => panic!("Expected image, got: {:?}", other),
    }

    match fetcher(&server, ServiceMode::Metadata).fetch("example.com").await {
        Ok(FetchResult::Metadata(payload)) => {
            assert_eq!(payload.title.as_deref(), Some("Example"));
            assert_eq!(payload.keywords, Some(vec!["a".to_string()]));
            assert!(payload.domain.is_none());
        }
        other => panic!("Expected metadata, got: {:?}", other),
    }
}
