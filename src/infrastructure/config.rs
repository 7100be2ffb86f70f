use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_DEVICE_API_URL: &str = "https://openapi.api.govee.com/router/api/v1/device/state";

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    pub server: ServerSettings,
    pub sensor: SensorSettings,
    pub history: HistorySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SensorSettings {
    pub device_api_url: String,
    pub device_sku: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub snapshot_url: Option<String>,
    pub credential_file: String,
    #[serde(default)]
    pub initial_api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistorySettings {
    pub csv_source: String,
    pub refresh_interval_secs: u64,
}

impl ServerSettings {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl HistorySettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

/// Defaults, then `config/monitor.toml` if present, then `FORMICARIUM__*` env vars.
pub fn load_config() -> anyhow::Result<MonitorConfig> {
    build_config(config::File::with_name("config/monitor").required(false))
}

fn build_config<S>(file: S) -> anyhow::Result<MonitorConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080_i64)?
        .set_default("sensor.device_api_url", DEFAULT_DEVICE_API_URL)?
        .set_default("sensor.device_sku", "H5179")?
        .set_default("sensor.credential_file", "data/api-key.txt")?
        .set_default("history.csv_source", "data/antfarm-climate.csv")?
        .set_default("history.refresh_interval_secs", 300_i64)?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix("FORMICARIUM")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: MonitorConfig = settings.try_deserialize()?;
    if config.history.refresh_interval_secs == 0 {
        anyhow::bail!("history.refresh_interval_secs must be at least 1");
    }
    Ok(config)
}
