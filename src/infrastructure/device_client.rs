// Device state clients - live device API and the published JSON snapshot
use crate::application::credential_store::CredentialStore;
use crate::application::reading_strategy::ReadingStrategy;
use crate::domain::reading::{SensorReading, SourceLabel};
use crate::error::AcquisitionError;
use crate::infrastructure::csv_parser::parse_timestamp;
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct DeviceStateDocument {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default, alias = "msg")]
    message: Option<String>,
    #[serde(default)]
    data: Option<DeviceStateData>,
    // The device API puts the payload at the top level; snapshots nest it under `data`.
    #[serde(default)]
    payload: Option<DevicePayload>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeviceStateData {
    #[serde(default)]
    payload: Option<DevicePayload>,
    // Older device-state responses list properties keyed by name, e.g. {"temperature": 76.1}
    #[serde(default)]
    properties: Vec<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct DevicePayload {
    #[serde(default)]
    capabilities: Vec<Capability>,
}

#[derive(Debug, Deserialize)]
struct Capability {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    instance: Option<String>,
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    state: Option<CapabilityState>,
}

#[derive(Debug, Deserialize)]
struct CapabilityState {
    #[serde(default)]
    value: Option<Value>,
}

impl Capability {
    fn label(&self) -> String {
        match &self.instance {
            Some(instance) => format!("{} {}", self.kind, instance).to_lowercase(),
            None => self.kind.to_lowercase(),
        }
    }

    fn raw_value(&self) -> Option<&Value> {
        self.value
            .as_ref()
            .or_else(|| self.state.as_ref().and_then(|s| s.value.as_ref()))
    }
}

/// Validate a device-state body and normalise it into a live reading.
pub fn parse_device_state(body: &str) -> Result<SensorReading, AcquisitionError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(AcquisitionError::EmptyBody);
    }
    if trimmed.starts_with('<') {
        return Err(AcquisitionError::NotYetGenerated);
    }

    let document: DeviceStateDocument = serde_json::from_str(trimmed)?;

    let code = document.code.ok_or(AcquisitionError::MissingField("code"))?;
    if code != 200 {
        return Err(AcquisitionError::Api {
            code,
            message: document
                .message
                .unwrap_or_else(|| "Failed to fetch device data".to_string()),
        });
    }

    let (data_payload, properties) = match document.data {
        Some(data) => (data.payload, data.properties),
        None => (None, Vec::new()),
    };
    let capabilities = data_payload
        .or(document.payload)
        .map(|p| p.capabilities)
        .unwrap_or_default();

    // Capabilities first, then the name-keyed property list
    let find_number = |needle: &str| {
        capabilities
            .iter()
            .filter(|c| c.label().contains(needle))
            .find_map(|c| c.raw_value().and_then(Value::as_f64))
            .or_else(|| properties.iter().find_map(|p| p.get(needle).and_then(Value::as_f64)))
    };

    let temperature_f = find_number("temperature").ok_or(AcquisitionError::MissingField("temperature"))?;
    let humidity = find_number("humidity").ok_or(AcquisitionError::MissingField("humidity"))?;
    let is_online = capabilities
        .iter()
        .filter(|c| c.label().contains("online"))
        .find_map(|c| c.raw_value().and_then(Value::as_bool))
        .or_else(|| properties.iter().find_map(|p| p.get("online").and_then(Value::as_bool)))
        .unwrap_or(true);

    let reading = SensorReading::new(temperature_f, humidity, is_online, SourceLabel::Live, Utc::now());

    let upstream_time = document.timestamp.as_deref().and_then(|ts| {
        let parsed = parse_timestamp(ts.trim());
        if parsed.is_none() {
            tracing::debug!(timestamp = ts, "Ignoring unparseable upstream timestamp");
        }
        parsed
    });

    Ok(match upstream_time {
        Some(ts) => reading.with_upstream_timestamp(ts, document.source),
        None => reading,
    })
}

async fn read_body(response: reqwest::Response) -> Result<String, AcquisitionError> {
    let status = response.status();
    if !status.is_success() {
        return Err(AcquisitionError::Status(status.as_u16()));
    }
    Ok(response.text().await?)
}

/// Fetches the JSON snapshot published out-of-band by a scheduled job
#[derive(Debug, Clone)]
pub struct SnapshotStrategy {
    client: reqwest::Client,
    url: String,
}

impl SnapshotStrategy {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl ReadingStrategy for SnapshotStrategy {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    async fn acquire(&self) -> Result<SensorReading, AcquisitionError> {
        tracing::debug!(url = %self.url, "Fetching sensor snapshot");
        let response = self
            .client
            .get(&self.url)
            .query(&[("t", Utc::now().timestamp_millis())])
            .send()
            .await?;

        let body = read_body(response).await?;
        parse_device_state(&body)
    }
}

/// Queries the device-state API directly with the remembered credential
#[derive(Clone)]
pub struct DeviceApiStrategy {
    client: reqwest::Client,
    url: String,
    sku: String,
    device: String,
    credentials: Arc<dyn CredentialStore>,
}

impl DeviceApiStrategy {
    pub fn new(
        client: reqwest::Client,
        url: String,
        sku: String,
        device: String,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            client,
            url,
            sku,
            device,
            credentials,
        }
    }
}

#[async_trait]
impl ReadingStrategy for DeviceApiStrategy {
    fn name(&self) -> &'static str {
        "device-api"
    }

    async fn acquire(&self) -> Result<SensorReading, AcquisitionError> {
        let api_key = match self.credentials.load().await {
            Ok(Some(key)) if !key.trim().is_empty() => key,
            Ok(_) => return Err(AcquisitionError::NoCredential),
            Err(e) => {
                tracing::warn!("Failed to load API credential: {}", e);
                return Err(AcquisitionError::NoCredential);
            }
        };

        let request_body = json!({
            "requestId": uuid::Uuid::new_v4().to_string(),
            "payload": {
                "sku": self.sku,
                "device": self.device,
            }
        });

        tracing::debug!(url = %self.url, device = %self.device, "Querying device state");
        let response = self
            .client
            .post(&self.url)
            .header("govee-api-key", api_key.trim())
            .json(&request_body)
            .send()
            .await?;

        let body = read_body(response).await?;
        parse_device_state(&body)
    }
}
