// Tests for the device-state strategies against a mocked upstream
// Uses mockito for HTTP mocking

use formicarium_monitor::application::acquisition_service::AcquisitionService;
use formicarium_monitor::application::reading_strategy::ReadingStrategy;
use formicarium_monitor::domain::reading::SourceLabel;
use formicarium_monitor::error::AcquisitionError;
use formicarium_monitor::infrastructure::credential_store::MemoryCredentialStore;
use formicarium_monitor::infrastructure::device_client::{DeviceApiStrategy, SnapshotStrategy};
use formicarium_monitor::infrastructure::synthetic::SyntheticGenerator;
use mockito::{Matcher, Server};
use std::sync::Arc;

const DEVICE_STATE: &str = r#"{
    "requestId": "1",
    "msg": "success",
    "code": 200,
    "payload": {
        "sku": "H5179",
        "device": "E2:A9:18:1F:68:82:D8:B7",
        "capabilities": [
            { "type": "devices.capabilities.online", "instance": "online", "state": { "value": true } },
            { "type": "devices.capabilities.property", "instance": "sensorTemperature", "state": { "value": 76.1 } },
            { "type": "devices.capabilities.property", "instance": "sensorHumidity", "state": { "value": 70.2 } }
        ]
    }
}"#;

#[tokio::test]
async fn test_snapshot_success_sends_cache_buster() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/sensor-data.json")
        .match_query(Matcher::Regex("t=\\d+".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(DEVICE_STATE)
        .create_async()
        .await;

    let strategy = SnapshotStrategy::new(
        reqwest::Client::new(),
        format!("{}/sensor-data.json", server.url()),
    );
    let reading = strategy.acquire().await.unwrap();

    mock.assert_async().await;
    assert_eq!(reading.source, SourceLabel::Live);
    assert_eq!(reading.temperature_f, 76.1);
    assert_eq!(reading.temperature_c, 24.5);
    assert_eq!(reading.humidity_pct, 70.2);
}

#[tokio::test]
async fn test_snapshot_html_404_is_status_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/sensor-data.json")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_header("content-type", "text/html")
        .with_body("<!DOCTYPE html><html><body><h1>404</h1></body></html>")
        .create_async()
        .await;

    let strategy = SnapshotStrategy::new(
        reqwest::Client::new(),
        format!("{}/sensor-data.json", server.url()),
    );

    assert!(matches!(strategy.acquire().await, Err(AcquisitionError::Status(404))));
}

#[tokio::test]
async fn test_snapshot_html_with_ok_status_not_yet_generated() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/sensor-data.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>placeholder</html>")
        .create_async()
        .await;

    let strategy = SnapshotStrategy::new(
        reqwest::Client::new(),
        format!("{}/sensor-data.json", server.url()),
    );

    assert!(matches!(strategy.acquire().await, Err(AcquisitionError::NotYetGenerated)));
}

#[tokio::test]
async fn test_html_404_falls_back_to_demo() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/sensor-data.json")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body("<!DOCTYPE html><html><body>Not Found</body></html>")
        .create_async()
        .await;

    let strategy: Arc<dyn ReadingStrategy> = Arc::new(SnapshotStrategy::new(
        reqwest::Client::new(),
        format!("{}/sensor-data.json", server.url()),
    ));
    let service = AcquisitionService::new(
        vec![strategy],
        Arc::new(SyntheticGenerator::seeded(3)),
        Arc::new(MemoryCredentialStore::default()),
    );

    let reading = service.acquire_reading().await;
    assert_eq!(reading.source, SourceLabel::Demo);
    assert!(reading.humidity_pct >= 50.0 && reading.humidity_pct <= 85.0);
}

#[tokio::test]
async fn test_device_api_sends_credential_and_device() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/device/state")
        .match_header("govee-api-key", "secret-key")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "payload": { "sku": "H5179", "device": "E2:A9:18:1F:68:82:D8:B7" }
        })))
        .with_status(200)
        .with_body(DEVICE_STATE)
        .create_async()
        .await;

    let strategy = DeviceApiStrategy::new(
        reqwest::Client::new(),
        format!("{}/device/state", server.url()),
        "H5179".to_string(),
        "E2:A9:18:1F:68:82:D8:B7".to_string(),
        Arc::new(MemoryCredentialStore::with_credential("secret-key")),
    );
    let reading = strategy.acquire().await.unwrap();

    mock.assert_async().await;
    assert!(reading.is_online);
    assert_eq!(reading.humidity_pct, 70.2);
}

#[tokio::test]
async fn test_device_api_without_credential_skips_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/device/state")
        .expect(0)
        .create_async()
        .await;

    let strategy = DeviceApiStrategy::new(
        reqwest::Client::new(),
        format!("{}/device/state", server.url()),
        "H5179".to_string(),
        "device".to_string(),
        Arc::new(MemoryCredentialStore::default()),
    );

    assert!(matches!(strategy.acquire().await, Err(AcquisitionError::NoCredential)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_device_api_error_code() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/device/state")
        .with_status(200)
        .with_body(r#"{"code": 401, "msg": "Invalid API key"}"#)
        .create_async()
        .await;

    let strategy = DeviceApiStrategy::new(
        reqwest::Client::new(),
        format!("{}/device/state", server.url()),
        "H5179".to_string(),
        "device".to_string(),
        Arc::new(MemoryCredentialStore::with_credential("bad-key")),
    );

    match strategy.acquire().await {
        Err(AcquisitionError::Api { code, message }) => {
            assert_eq!(code, 401);
            assert_eq!(message, "Invalid API key");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}
