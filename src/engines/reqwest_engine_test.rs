use crate::engines::reqwest_engine::ReqwestEngine;
use crate::engines::traits::{EngineError, FetchEngine, FetchRequest};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_returns_body_and_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/Ahri"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Ahri</html>"))
        .mount(&server)
        .await;

    let engine = ReqwestEngine::new("fandomrs-test").unwrap();
    let request = FetchRequest::new(format!("{}/wiki/Ahri", server.uri()));
    let response = engine.fetch(&request).await.unwrap();

    assert_eq!(response.status_code, 200);
    assert!(response.content.contains("Ahri"));
}

#[tokio::test]
async fn test_fetch_maps_server_error_to_bad_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let engine = ReqwestEngine::new("fandomrs-test").unwrap();
    let request = FetchRequest::new(format!("{}/wiki/Down", server.uri()));
    let err = engine.fetch(&request).await.unwrap_err();

    assert!(matches!(err, EngineError::BadStatus(503)));
}

#[tokio::test]
async fn test_fetch_connection_refused_is_request_failure() {
    // Port 1 is essentially never listening
    let engine = ReqwestEngine::new("fandomrs-test").unwrap();
    let request = FetchRequest::new("http://127.0.0.1:1/wiki/Nope");
    let err = engine.fetch(&request).await.unwrap_err();

    assert!(matches!(err, EngineError::RequestFailed(_)));
}
